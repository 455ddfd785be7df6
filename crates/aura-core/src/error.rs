use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid key segment: {0:?}")]
    InvalidKeySegment(String),
}
