//! Terminal host for the module shell.
//!
//! Wires configuration, identity and entitlements into a
//! [`sailor_modules::ModuleSession`] and drives it from line-oriented input.

pub mod args;
pub mod command;
pub mod render;
mod shell;

pub use args::Cli;
pub use command::{Command, CommandError};
pub use shell::{Reply, Shell, ShellEntitlements};
