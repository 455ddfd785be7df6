//! In-process object store with the same ETag semantics as S3.
//!
//! Used by tests and by local runs with `AURA_STORAGE=memory`. Keys are kept
//! in a `BTreeMap` so prefix listings come back in the same lexicographic
//! order S3 returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::objects::GetObjectOutput;

struct MemoryObject {
    body: Vec<u8>,
    content_type: Option<String>,
    etag: String,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, MemoryObject>,
    version: u64,
    writes: u64,
}

impl Inner {
    fn write(&mut self, key: &str, body: Vec<u8>, content_type: Option<&str>) -> String {
        self.version += 1;
        self.writes += 1;
        let etag = format!("\"{:016x}\"", self.version);
        self.objects.insert(
            key.to_string(),
            MemoryObject {
                body,
                content_type: content_type.map(str::to_string),
                etag: etag.clone(),
            },
        );
        etag
    }
}

/// Shared handle; clones see the same objects.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful puts and deletes since creation.
    pub async fn write_count(&self) -> u64 {
        self.inner.lock().await.writes
    }

    pub async fn get_object(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        let inner = self.inner.lock().await;
        let obj = inner.objects.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        Ok(GetObjectOutput {
            body: obj.body.clone(),
            etag: Some(obj.etag.clone()),
            content_type: obj.content_type.clone(),
        })
    }

    pub async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.inner.lock().await.objects.contains_key(key))
    }

    pub async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        Ok(self.inner.lock().await.write(key, body, content_type))
    }

    pub async fn put_object_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let mut inner = self.inner.lock().await;
        match inner.objects.get(key) {
            Some(obj) if obj.etag == expected_etag => {}
            _ => {
                return Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                });
            }
        }
        Ok(inner.write(key, body, content_type))
    }

    pub async fn put_object_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut inner = self.inner.lock().await;
        if inner.objects.contains_key(key) {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        Ok(inner.write(key, body, content_type))
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        if inner.objects.remove(key).is_some() {
            inner.writes += 1;
        }
        Ok(())
    }

    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
