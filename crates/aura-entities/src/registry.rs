use aura_assist::client::Assistant;
use aura_core::models::user::User;
use aura_storage::entity::{EntityStore, StoreLimits};
use aura_storage::storage::Storage;

use crate::chats::ChatBoards;
use crate::defs;
use crate::patients::Patients;

/// Every entity type of the registry, sharing one storage handle.
#[derive(Clone)]
pub struct Entities {
    pub users: EntityStore<User>,
    pub patients: Patients,
    pub chats: ChatBoards,
}

impl Entities {
    pub fn new(storage: Storage, limits: StoreLimits, assistant: Option<Assistant>) -> Self {
        let users = EntityStore::new(storage.clone(), &defs::USERS, limits);
        let patient_store = EntityStore::new(storage.clone(), &defs::PATIENTS, limits);
        let chat_store = EntityStore::new(storage, &defs::CHATS, limits);

        Self {
            users,
            patients: Patients::new(patient_store.clone(), assistant.clone()),
            chats: ChatBoards::new(chat_store, patient_store, assistant),
        }
    }
}
