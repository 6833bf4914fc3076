use sailor_derive::sailor_error;

#[sailor_error]
pub enum DemoError {
    #[error("IO error: {source}")]
    Io { source: std::io::Error, context: Option<String> },
}

fn main() {}
