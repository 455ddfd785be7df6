pub mod chat;
pub mod evidence;
pub mod page;
pub mod patient;
pub mod response;
pub mod stats;
pub mod user;
