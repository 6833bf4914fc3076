//! Error taxonomy of the module-access slice.
//!
//! Each enum lives in its own file since `sailor_error` emits a
//! `format_context` helper next to the type it expands.

mod factory;
mod module;
mod session;

pub use factory::{FactoryError, FactoryErrorExt};
pub use module::{ModuleError, ModuleErrorExt};
pub use session::{SessionError, SessionErrorExt};
