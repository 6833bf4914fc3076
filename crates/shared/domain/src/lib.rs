//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no async, no heavy logic. Just data and simple helpers.

pub mod config;
pub mod constants;
pub mod identity;
pub mod module;
