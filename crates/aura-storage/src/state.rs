use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::StorageError;
use crate::storage::Storage;

const JSON: Option<&str> = Some("application/json");

/// Load a JSON state object. Returns the deserialized value and its ETag.
pub async fn load_state<T: DeserializeOwned>(
    storage: &Storage,
    key: &str,
) -> Result<(T, String), StorageError> {
    let output = storage.get_object(key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    let etag = output.etag.unwrap_or_default();
    Ok((value, etag))
}

/// Save a JSON state object unconditionally. Returns the new ETag.
pub async fn save_state<T: Serialize>(
    storage: &Storage,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    storage.put_object(key, body, JSON).await
}

/// Save a JSON state object with ETag optimistic locking.
pub async fn save_state_if_match<T: Serialize>(
    storage: &Storage,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    storage
        .put_object_if_match(key, body, JSON, expected_etag)
        .await
}

/// Create a JSON state object, failing with `PreconditionFailed` if one exists.
pub async fn create_state<T: Serialize>(
    storage: &Storage,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    storage.put_object_if_absent(key, body, JSON).await
}

/// Outcome of one application of a read-modify-write step.
pub enum Change<T> {
    /// Persist the value.
    Write(T),
    /// Leave storage untouched and return the value as-is.
    Keep(T),
}

/// Result of [`read_modify_write`].
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    /// The object did not exist and was created by this call.
    pub created: bool,
    /// Something was written.
    pub written: bool,
}

/// Optimistic read-modify-write of one JSON object.
///
/// Reads the object and its ETag, applies `f`, and writes the result back
/// conditioned on the ETag still matching (or on the key still being absent
/// when starting from `initial`). A lost race re-reads and re-applies `f`, so
/// `f` must be a pure function of its input. Fails with
/// `StorageError::Contention` after `max_attempts` lost races.
///
/// With `initial == None` a missing object is `StorageError::NotFound`.
pub async fn read_modify_write<T, F>(
    storage: &Storage,
    key: &str,
    initial: Option<fn() -> T>,
    max_attempts: u32,
    mut f: F,
) -> Result<Mutation<T>, StorageError>
where
    T: Serialize + DeserializeOwned,
    F: FnMut(T) -> Change<T>,
{
    for attempt in 1..=max_attempts.max(1) {
        let (current, etag) = match load_state::<T>(storage, key).await {
            Ok((value, etag)) => (value, Some(etag)),
            Err(StorageError::NotFound { .. }) => match initial {
                Some(init) => (init(), None),
                None => {
                    return Err(StorageError::NotFound {
                        key: key.to_string(),
                    });
                }
            },
            Err(e) => return Err(e),
        };

        let next = match f(current) {
            Change::Keep(value) => {
                return Ok(Mutation {
                    value,
                    created: false,
                    written: false,
                });
            }
            Change::Write(value) => value,
        };

        let written = match &etag {
            Some(etag) => save_state_if_match(storage, key, &next, etag).await,
            None => create_state(storage, key, &next).await,
        };

        match written {
            Ok(_) => {
                return Ok(Mutation {
                    value: next,
                    created: etag.is_none(),
                    written: true,
                });
            }
            Err(StorageError::PreconditionFailed { .. }) => {
                debug!(key, attempt, "write conflict, retrying");
                tokio::time::sleep(Duration::from_millis(u64::from(attempt.min(10)) * 2)).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(StorageError::Contention {
        key: key.to_string(),
        attempts: max_attempts.max(1),
    })
}
