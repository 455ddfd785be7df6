use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),
}
