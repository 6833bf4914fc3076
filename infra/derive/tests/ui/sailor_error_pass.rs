use sailor_derive::sailor_error;
use std::borrow::Cow;

#[sailor_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err::<(), _>(std::io::Error::other("disk"))?;
    Ok(())
}

fn main() {
    let err = read().context("reading manifest").unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading manifest): disk");

    let internal: DemoError = "boom".into();
    assert!(matches!(internal, DemoError::Internal { .. }));
}
