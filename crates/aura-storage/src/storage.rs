use aws_sdk_s3::Client as S3Client;

use crate::error::StorageError;
use crate::memory::MemoryBackend;
use crate::objects::{self, GetObjectOutput};

/// Handle to the object store every record, index and blob lives in.
///
/// Cheap to clone. Constructed once at startup and passed explicitly to
/// whatever needs persistence.
#[derive(Clone)]
pub struct Storage {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    S3 { client: S3Client, bucket: String },
    Memory(MemoryBackend),
}

impl Storage {
    pub fn s3(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            backend: Backend::S3 {
                client,
                bucket: bucket.into(),
            },
        }
    }

    pub fn memory(backend: MemoryBackend) -> Self {
        Self {
            backend: Backend::Memory(backend),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::S3 { .. } => "s3",
            Backend::Memory(_) => "memory",
        }
    }

    pub async fn get_object(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => objects::get_object(client, bucket, key).await,
            Backend::Memory(mem) => mem.get_object(key).await,
        }
    }

    pub async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => objects::object_exists(client, bucket, key).await,
            Backend::Memory(mem) => mem.object_exists(key).await,
        }
    }

    pub async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => {
                objects::put_object(client, bucket, key, body, content_type).await
            }
            Backend::Memory(mem) => mem.put_object(key, body, content_type).await,
        }
    }

    pub async fn put_object_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => {
                objects::put_object_if_match(client, bucket, key, body, content_type, expected_etag)
                    .await
            }
            Backend::Memory(mem) => {
                mem.put_object_if_match(key, body, content_type, expected_etag)
                    .await
            }
        }
    }

    pub async fn put_object_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => {
                objects::put_object_if_absent(client, bucket, key, body, content_type).await
            }
            Backend::Memory(mem) => mem.put_object_if_absent(key, body, content_type).await,
        }
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => objects::delete_object(client, bucket, key).await,
            Backend::Memory(mem) => mem.delete_object(key).await,
        }
    }

    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        match &self.backend {
            Backend::S3 { client, bucket } => objects::list_objects(client, bucket, prefix).await,
            Backend::Memory(mem) => mem.list_objects(prefix).await,
        }
    }

    /// Delete all objects under a prefix. Returns the number of objects deleted.
    pub async fn delete_objects_by_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let keys = self.list_objects(prefix).await?;
        let count = keys.len();
        for key in &keys {
            self.delete_object(key).await?;
        }
        Ok(count)
    }
}
