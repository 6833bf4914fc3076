//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it owns layered config loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use sailor_kernel::config::load_config;
//! use sailor_kernel::domain::config::ShellConfig;
//!
//! let cfg: ShellConfig = load_config(Some("config/shell.toml")).unwrap_or_default();
//! assert!(!cfg.shell.title.is_empty());
//! ```
pub mod config;

pub use sailor_domain as domain;
