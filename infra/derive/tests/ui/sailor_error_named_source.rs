use sailor_derive::sailor_error;
use std::borrow::Cow;
use std::sync::Arc;

// A variant carrying data beside its source gets `.context()` but no `From`.
#[sailor_error]
#[derive(Clone)]
pub enum DemoError {
    #[error("Load failed{}: {name}: {source}", format_context(.context))]
    Load {
        name: Cow<'static, str>,
        source: Arc<std::io::Error>,
        context: Option<Cow<'static, str>>,
    },
}

fn main() {
    let err = DemoError::Load {
        name: "boats".into(),
        source: Arc::new(std::io::Error::other("gone")),
        context: None,
    };
    let res: Result<(), DemoError> = Err(err);
    let err = res.context("retry").unwrap_err();
    assert_eq!(err.clone().to_string(), "Load failed (retry): boats: gone");
}
