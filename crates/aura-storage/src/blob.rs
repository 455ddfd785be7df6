//! Binary payloads stored beside a record in its partition.
//!
//! Blobs never travel with the record's JSON, so mutating structured fields
//! stays cheap no matter how large the attached payloads are. Payloads are
//! stored base64-encoded.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use aura_core::keys;

use crate::error::StorageError;
use crate::storage::Storage;

const BLOB_CONTENT_TYPE: Option<&str> = Some("text/plain; charset=base64");

/// Blob store scoped to one record partition.
#[derive(Clone)]
pub struct BlobStore {
    storage: Storage,
    kind: String,
    id: String,
}

impl BlobStore {
    pub fn new(storage: Storage, kind: &str, id: &str) -> Result<Self, StorageError> {
        keys::validate_segment(kind)?;
        keys::validate_segment(id)?;
        Ok(Self {
            storage,
            kind: kind.to_string(),
            id: id.to_string(),
        })
    }

    fn key(&self, blob_key: &str) -> Result<String, StorageError> {
        keys::validate_segment(blob_key)?;
        Ok(keys::blob(&self.kind, &self.id, blob_key))
    }

    /// Store `bytes` under `blob_key`, replacing any previous payload.
    pub async fn put_blob(&self, blob_key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let key = self.key(blob_key)?;
        let encoded = STANDARD.encode(bytes);
        self.storage
            .put_object(&key, encoded.into_bytes(), BLOB_CONTENT_TYPE)
            .await?;
        debug!(key = %key, size = bytes.len(), "blob stored");
        Ok(())
    }

    pub async fn get_blob(&self, blob_key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let key = self.key(blob_key)?;
        match self.storage.get_object(&key).await {
            Ok(output) => Ok(Some(STANDARD.decode(&output.body)?)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete the payload under `blob_key`. Returns whether one existed.
    pub async fn del_blob(&self, blob_key: &str) -> Result<bool, StorageError> {
        let key = self.key(blob_key)?;
        if !self.storage.object_exists(&key).await? {
            return Ok(false);
        }
        self.storage.delete_object(&key).await?;
        debug!(key = %key, "blob deleted");
        Ok(true)
    }

    /// Delete every blob in the partition. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, StorageError> {
        self.storage
            .delete_objects_by_prefix(&keys::blobs_prefix(&self.kind, &self.id))
            .await
    }
}
