//! Per-type id index.
//!
//! The index is a single JSON object holding every id of one entity type in
//! insertion order. All changes go through [`read_modify_write`], so
//! concurrent adds and removes never overwrite each other.

use serde::{Deserialize, Serialize};
use tracing::debug;

use aura_core::keys;

use crate::error::StorageError;
use crate::state::{self, Change, read_modify_write};
use crate::storage::Storage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexState {
    ids: Vec<String>,
}

#[derive(Clone)]
pub struct Index {
    storage: Storage,
    name: String,
    key: String,
    max_attempts: u32,
}

impl Index {
    pub fn new(storage: Storage, name: &str, max_attempts: u32) -> Self {
        Self {
            storage,
            name: name.to_string(),
            key: keys::index(name),
            max_attempts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All ids in insertion order. A missing index object is an empty index.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        match state::load_state::<IndexState>(&self.storage, &self.key).await {
            Ok((index, _)) => Ok(index.ids),
            Err(StorageError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.list().await?.is_empty())
    }

    /// Append `id` if absent. Returns whether it was added.
    pub async fn add(&self, id: &str) -> Result<bool, StorageError> {
        let mutation = read_modify_write(
            &self.storage,
            &self.key,
            Some(IndexState::default as fn() -> IndexState),
            self.max_attempts,
            |mut index: IndexState| {
                if index.ids.iter().any(|existing| existing == id) {
                    Change::Keep(index)
                } else {
                    index.ids.push(id.to_string());
                    Change::Write(index)
                }
            },
        )
        .await?;

        if mutation.written {
            debug!(index = %self.name, id, "index add");
        }
        Ok(mutation.written)
    }

    /// Remove `id` if present. Returns whether it was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mutation = read_modify_write(
            &self.storage,
            &self.key,
            Some(IndexState::default as fn() -> IndexState),
            self.max_attempts,
            |mut index: IndexState| {
                let before = index.ids.len();
                index.ids.retain(|existing| existing != id);
                if index.ids.len() == before {
                    Change::Keep(index)
                } else {
                    Change::Write(index)
                }
            },
        )
        .await?;

        if mutation.written {
            debug!(index = %self.name, id, "index remove");
        }
        Ok(mutation.written)
    }
}
