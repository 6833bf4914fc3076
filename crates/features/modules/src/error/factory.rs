use std::borrow::Cow;

/// Why a module factory could not produce an implementation.
#[sailor_derive::sailor_error]
pub enum FactoryError {
    /// The factory resolved, but without the component the shell renders.
    #[error("Module does not export a default component{}: {message}", format_context(.context))]
    MissingEntryPoint { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Module factory failed{}: {message}", format_context(.context))]
    Failed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Module factory timed out{}: no result after {elapsed_ms} ms", format_context(.context))]
    TimedOut { elapsed_ms: u64, context: Option<Cow<'static, str>> },
}

impl FactoryError {
    pub fn failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Failed { message: message.into(), context: None }
    }
}
