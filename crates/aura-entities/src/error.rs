use thiserror::Error;

use aura_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl EntityError {
    /// Storage error mapper that names the missing thing on `NotFound`.
    pub fn lookup(what: &'static str) -> impl FnOnce(StorageError) -> EntityError {
        move |e| match e {
            StorageError::NotFound { .. } => EntityError::NotFound(format!("{what} not found")),
            other => other.into(),
        }
    }
}

impl From<StorageError> for EntityError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { key } => EntityError::NotFound(format!("not found: {key}")),
            StorageError::InvalidCursor(cursor) => {
                EntityError::BadRequest(format!("unknown cursor: {cursor}"))
            }
            StorageError::InvalidKey(e) => EntityError::BadRequest(e.to_string()),
            other => EntityError::Storage(other),
        }
    }
}
