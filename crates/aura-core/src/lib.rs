//! aura-core
//!
//! Pure domain types, the API envelope, and storage key conventions.
//! No AWS SDK dependency: this is the shared vocabulary of the Aura registry.

pub mod error;
pub mod keys;
pub mod models;
