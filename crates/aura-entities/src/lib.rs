//! aura-entities
//!
//! Domain entities of the Aura registry (users, patients, chat boards) layered
//! on the generic entity store, plus the registry entries and seed data that
//! bootstrap an empty deployment.

pub mod chats;
pub mod defs;
pub mod error;
pub mod patients;
pub mod registry;
pub mod seed;
