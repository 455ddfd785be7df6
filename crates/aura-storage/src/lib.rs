//! aura-storage
//!
//! Record persistence for the Aura registry: object storage backends (S3 and
//! in-memory), JSON state with ETag optimistic locking, the per-type id index,
//! per-record blob storage, and the generic entity store built on top.

pub mod blob;
pub mod client;
pub mod entity;
pub mod error;
pub mod index;
pub mod memory;
pub mod objects;
pub mod state;
pub mod storage;
