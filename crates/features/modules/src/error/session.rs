use std::borrow::Cow;

/// Failures while fetching or changing a user's entitlements.
#[sailor_derive::sailor_error]
pub enum SessionError {
    /// The entitlement backend rejected or could not serve the request.
    #[error("Entitlement source error{}: {message}", format_context(.context))]
    Source { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Entitlement file error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Entitlement document error{}: {source}", format_context(.context))]
    Parse { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
