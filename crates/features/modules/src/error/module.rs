use super::FactoryError;
use std::borrow::Cow;
use std::sync::Arc;

/// Outcomes of the module-access core that are not a loaded module.
///
/// Cloneable so a failure can live inside [`crate::LoaderState`] and be
/// handed to every observer of the state channel.
#[sailor_derive::sailor_error]
#[derive(Clone)]
pub enum ModuleError {
    /// The name is absent from the registry.
    #[error("Module not found{}: {name}", format_context(.context))]
    NotFound { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The entitlement predicate rejected the module for this user.
    #[error("Access denied to this module{}: {name}", format_context(.context))]
    AccessDenied { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The factory ran and failed. Never cached; retrying re-invokes the factory.
    #[error("Failed to load module{}: {name}: {source}", format_context(.context))]
    LoadFailure {
        name: Cow<'static, str>,
        source: Arc<FactoryError>,
        context: Option<Cow<'static, str>>,
    },

    /// The registry could not be assembled.
    #[error("Module registry error{}: {message}", format_context(.context))]
    Registry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ModuleError {
    pub fn not_found(name: &str) -> Self {
        Self::NotFound { name: Cow::Owned(name.to_owned()), context: None }
    }

    pub fn access_denied(name: &str) -> Self {
        Self::AccessDenied { name: Cow::Owned(name.to_owned()), context: None }
    }

    pub fn load_failure(name: &str, source: Arc<FactoryError>) -> Self {
        Self::LoadFailure { name: Cow::Owned(name.to_owned()), source, context: None }
    }

    /// The module the error is about, when there is one.
    pub fn module_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name, .. }
            | Self::AccessDenied { name, .. }
            | Self::LoadFailure { name, .. } => Some(&**name),
            Self::Registry { .. } => None,
        }
    }

    /// Only load failures offer a retry affordance.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LoadFailure { .. })
    }
}
