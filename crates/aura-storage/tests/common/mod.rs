#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use aura_storage::entity::{EntityDef, EntityStore, StoreLimits};
use aura_storage::memory::MemoryBackend;
use aura_storage::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub count: u64,
}

fn record(id: &str) -> Record {
    Record {
        id: id.to_string(),
        count: 0,
    }
}

pub static RECORDS: EntityDef<Record> = EntityDef {
    kind: "record",
    index: "records",
    initial_state: Record::default,
    seed_data: || vec![record("p1"), record("p2"), record("p3")],
    id_of: |r| r.id.as_str(),
};

pub static UNSEEDED: EntityDef<Record> = EntityDef {
    kind: "unseeded",
    index: "unseeded",
    initial_state: Record::default,
    seed_data: Vec::new,
    id_of: |r| r.id.as_str(),
};

pub fn memory_store(def: &'static EntityDef<Record>) -> (MemoryBackend, EntityStore<Record>) {
    memory_store_with(def, StoreLimits::default())
}

pub fn memory_store_with(
    def: &'static EntityDef<Record>,
    limits: StoreLimits,
) -> (MemoryBackend, EntityStore<Record>) {
    let mem = MemoryBackend::new();
    let store = EntityStore::new(Storage::memory(mem.clone()), def, limits);
    (mem, store)
}
