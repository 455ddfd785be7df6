#![allow(dead_code)]

use aura_entities::registry::Entities;
use aura_storage::entity::StoreLimits;
use aura_storage::memory::MemoryBackend;
use aura_storage::storage::Storage;

/// Registry over a fresh in-memory backend, without a generative model.
pub fn memory_entities() -> (MemoryBackend, Entities) {
    let mem = MemoryBackend::new();
    let entities = Entities::new(Storage::memory(mem.clone()), StoreLimits::default(), None);
    (mem, entities)
}

/// Same, with patients and chats already seeded.
pub async fn seeded_entities() -> (MemoryBackend, Entities) {
    let (mem, entities) = memory_entities();
    entities.patients.ensure_seed().await.unwrap();
    entities.chats.ensure_seed().await.unwrap();
    entities.users.ensure_seed().await.unwrap();
    (mem, entities)
}

/// Minimal PNG signature plus padding; never decoded.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
