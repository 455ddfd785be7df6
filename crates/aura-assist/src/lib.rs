//! aura-assist
//!
//! Generative-model collaborator (Bedrock Converse) and the deterministic
//! responders used whenever it is unavailable or fails.

pub mod client;
pub mod context;
pub mod error;
pub mod respond;
