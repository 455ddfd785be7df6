//! Registry entries for every entity type.

use aura_core::models::chat::ChatBoard;
use aura_core::models::patient::Patient;
use aura_core::models::user::User;
use aura_storage::entity::EntityDef;

use crate::seed;

pub static USERS: EntityDef<User> = EntityDef {
    kind: "user",
    index: "users",
    initial_state: User::default,
    seed_data: seed::users,
    id_of: |u| u.id.as_str(),
};

pub static PATIENTS: EntityDef<Patient> = EntityDef {
    kind: "patient",
    index: "patients",
    initial_state: Patient::default,
    seed_data: seed::patients,
    id_of: |p| p.id.as_str(),
};

pub static CHATS: EntityDef<ChatBoard> = EntityDef {
    kind: "chat",
    index: "chats",
    initial_state: ChatBoard::default,
    seed_data: seed::chat_boards,
    id_of: |c| c.id.as_str(),
};
