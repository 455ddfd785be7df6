//! Generic indexed entity store.
//!
//! One [`EntityStore`] serves every record type. What differs between types
//! (storage kind, index name, initial state, seed data, id accessor) lives in
//! a static [`EntityDef`] registry entry, and serde JSON is the codec.
//!
//! Each record owns the partition `entities/<kind>/<id>/`. Mutations are
//! optimistic compare-and-swap on the record's ETag, retried up to
//! [`StoreLimits::max_mutate_attempts`] times, so two concurrent mutations of
//! the same id are applied one after the other and never lose an update.
//!
//! The platform caps concurrent sub-operations per request, so every fan-out
//! here is bounded: list pages by [`StoreLimits::max_page_size`] and seeding
//! by [`StoreLimits::seed_concurrency`].

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tracing::{info, warn};

use aura_core::keys;
use aura_core::models::page::Page;

use crate::blob::BlobStore;
use crate::error::StorageError;
use crate::index::Index;
use crate::state::{self, Change, read_modify_write};
use crate::storage::Storage;

/// Registry entry describing one entity type.
pub struct EntityDef<T: 'static> {
    /// Partition namespace, e.g. `patient`.
    pub kind: &'static str,
    /// Index name, e.g. `patients`.
    pub index: &'static str,
    /// State a record starts from when mutated before it exists.
    pub initial_state: fn() -> T,
    /// Records created by [`EntityStore::ensure_seed`] on an empty index.
    pub seed_data: fn() -> Vec<T>,
    pub id_of: fn(&T) -> &str,
}

/// Fan-out and retry bounds.
#[derive(Debug, Clone, Copy)]
pub struct StoreLimits {
    pub max_page_size: usize,
    pub seed_concurrency: usize,
    pub max_mutate_attempts: u32,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_page_size: 40,
            seed_concurrency: 1,
            max_mutate_attempts: 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The index was empty and this many records were created.
    Seeded(usize),
    /// Data already exists; nothing was written.
    AlreadySeeded,
    /// The type has no seed data configured.
    NoSeedData,
}

pub struct EntityStore<T: 'static> {
    storage: Storage,
    def: &'static EntityDef<T>,
    index: Index,
    limits: StoreLimits,
    // true once this process has seen a non-empty index
    seeded: Arc<Mutex<bool>>,
}

impl<T: 'static> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            def: self.def,
            index: self.index.clone(),
            limits: self.limits,
            seeded: Arc::clone(&self.seeded),
        }
    }
}

impl<T> EntityStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(storage: Storage, def: &'static EntityDef<T>, limits: StoreLimits) -> Self {
        let index = Index::new(storage.clone(), def.index, limits.max_mutate_attempts);
        Self {
            storage,
            def,
            index,
            limits,
            seeded: Arc::new(Mutex::new(false)),
        }
    }

    pub fn def(&self) -> &'static EntityDef<T> {
        self.def
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    fn state_key(&self, id: &str) -> Result<String, StorageError> {
        keys::validate_segment(id)?;
        Ok(keys::entity_state(self.def.kind, id))
    }

    /// Blob store for the partition of record `id`.
    pub fn blobs(&self, id: &str) -> Result<BlobStore, StorageError> {
        BlobStore::new(self.storage.clone(), self.def.kind, id)
    }

    /// Whether record `id` exists. Ids that cannot name a record are simply absent.
    pub async fn exists(&self, id: &str) -> Result<bool, StorageError> {
        match self.state_key(id) {
            Ok(key) => self.storage.object_exists(&key).await,
            Err(_) => Ok(false),
        }
    }

    pub async fn get_state(&self, id: &str) -> Result<T, StorageError> {
        let key = self.state_key(id)?;
        let (value, _etag) = state::load_state(&self.storage, &key).await?;
        Ok(value)
    }

    /// Unconditional upsert. Does not touch the index.
    pub async fn save(&self, id: &str, value: &T) -> Result<(), StorageError> {
        let key = self.state_key(id)?;
        state::save_state(&self.storage, &key, value).await?;
        Ok(())
    }

    /// Create record `id` if absent and add it to the index.
    /// Returns false, without writing the record, if it already existed.
    pub async fn create(&self, id: &str, value: &T) -> Result<bool, StorageError> {
        let key = self.state_key(id)?;
        let created = match state::create_state(&self.storage, &key, value).await {
            Ok(_) => true,
            Err(StorageError::PreconditionFailed { .. }) => false,
            Err(e) => return Err(e),
        };
        self.index.add(id).await?;
        Ok(created)
    }

    /// Apply `f` to the current state, or to the initial state if the record
    /// does not exist yet, and persist the result. The id is always ensured in
    /// the index, so a record whose index add failed earlier is relisted.
    pub async fn mutate<F>(&self, id: &str, mut f: F) -> Result<T, StorageError>
    where
        F: FnMut(T) -> T,
    {
        let key = self.state_key(id)?;
        let mutation = read_modify_write(
            &self.storage,
            &key,
            Some(self.def.initial_state),
            self.limits.max_mutate_attempts,
            |current| Change::Write(f(current)),
        )
        .await?;

        self.index.add(id).await?;
        Ok(mutation.value)
    }

    /// Like [`mutate`](Self::mutate) but fails with `NotFound` for a missing
    /// record instead of creating it.
    pub async fn update<F>(&self, id: &str, mut f: F) -> Result<T, StorageError>
    where
        F: FnMut(T) -> T,
    {
        self.modify(id, |current| Change::Write(f(current))).await
    }

    /// Conditional update of an existing record: `f` may decline to write by
    /// returning [`Change::Keep`].
    pub async fn modify<F>(&self, id: &str, f: F) -> Result<T, StorageError>
    where
        F: FnMut(T) -> Change<T>,
    {
        let key = self.state_key(id)?;
        let mutation =
            read_modify_write(&self.storage, &key, None, self.limits.max_mutate_attempts, f)
                .await?;
        Ok(mutation.value)
    }

    /// Remove record `id`, its blobs, and its index entry.
    /// Returns whether the record existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let key = self.state_key(id)?;
        let existed = self.storage.object_exists(&key).await?;
        // Unlist first so a concurrent list never returns a half-deleted record.
        self.index.remove(id).await?;
        self.storage
            .delete_objects_by_prefix(&keys::partition_prefix(self.def.kind, id))
            .await?;
        Ok(existed)
    }

    /// Create the seed records if the index is empty.
    ///
    /// Records are saved through a stream capped at
    /// `StoreLimits::seed_concurrency` in-flight writes (1 by default, i.e.
    /// strictly one save then one index add at a time). Index adds happen in
    /// seed order regardless of the cap.
    pub async fn ensure_seed(&self) -> Result<SeedOutcome, StorageError> {
        let mut seeded = self.seeded.lock().await;
        if *seeded {
            return Ok(SeedOutcome::AlreadySeeded);
        }

        if !self.index.is_empty().await? {
            *seeded = true;
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let records = (self.def.seed_data)();
        if records.is_empty() {
            return Ok(SeedOutcome::NoSeedData);
        }

        let mut saves = stream::iter(records)
            .map(|record| async move {
                let id = (self.def.id_of)(&record).to_string();
                self.save(&id, &record).await?;
                Ok::<_, StorageError>(id)
            })
            .buffered(self.limits.seed_concurrency.max(1));

        let mut count = 0;
        while let Some(id) = saves.try_next().await? {
            self.index.add(&id).await?;
            count += 1;
        }

        *seeded = true;
        info!(kind = self.def.kind, count, "seeded entities");
        Ok(SeedOutcome::Seeded(count))
    }

    /// Up to `limit` records in index order, starting after `cursor`.
    ///
    /// `limit` defaults to and is clamped by `StoreLimits::max_page_size`.
    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<T>, StorageError> {
        let max = self.limits.max_page_size.max(1);
        let limit = limit.unwrap_or(max).clamp(1, max);
        let ids = self.index.list().await?;

        let start = match cursor {
            None => 0,
            Some(cursor) => {
                ids.iter()
                    .position(|id| id == cursor)
                    .ok_or_else(|| StorageError::InvalidCursor(cursor.to_string()))?
                    + 1
            }
        };
        let end = start.saturating_add(limit).min(ids.len());
        let page_ids = &ids[start..end];

        let items: Vec<Option<T>> = stream::iter(page_ids.to_vec())
            .map(|id| async move {
                match self.get_state(&id).await {
                    Ok(value) => Ok(Some(value)),
                    Err(StorageError::NotFound { key }) => {
                        warn!(index = self.def.index, id = %id, key = %key, "indexed record missing");
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .buffered(limit)
            .try_collect()
            .await?;

        let next_cursor = if end < ids.len() {
            page_ids.last().cloned()
        } else {
            None
        };

        Ok(Page {
            items: items.into_iter().flatten().collect(),
            next_cursor,
        })
    }

    /// Walk the index page by page, collecting at most `max` records.
    pub async fn collect(&self, max: usize) -> Result<Vec<T>, StorageError> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        while out.len() < max {
            let want = (max - out.len()).min(self.limits.max_page_size.max(1));
            let page = self.list(cursor.as_deref(), Some(want)).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(out)
    }
}
