//! Chat boards: a conversation title, an optional grounding patient, and the
//! append-only message log.

use jiff::Timestamp;
use tracing::{info, warn};

use aura_assist::client::{Assistant, CHAT_SYSTEM_PROMPT};
use aura_assist::context::build_chat_prompt;
use aura_assist::respond::generate_record_aware_response;
use aura_core::models::chat::{BOT_USER_ID, Chat, ChatBoard, ChatMessage, SentMessages};
use aura_core::models::page::Page;
use aura_core::models::patient::Patient;
use aura_storage::entity::{EntityStore, SeedOutcome};

use crate::error::EntityError;

#[derive(Clone)]
pub struct ChatBoards {
    store: EntityStore<ChatBoard>,
    patients: EntityStore<Patient>,
    assistant: Option<Assistant>,
}

impl ChatBoards {
    pub fn new(
        store: EntityStore<ChatBoard>,
        patients: EntityStore<Patient>,
        assistant: Option<Assistant>,
    ) -> Self {
        Self {
            store,
            patients,
            assistant,
        }
    }

    pub fn store(&self) -> &EntityStore<ChatBoard> {
        &self.store
    }

    pub async fn ensure_seed(&self) -> Result<SeedOutcome, EntityError> {
        Ok(self.store.ensure_seed().await?)
    }

    /// Chat summaries, without their message logs.
    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<Chat>, EntityError> {
        let page = self.store.list(cursor, limit).await?;
        Ok(page.map(|board| board.summary()))
    }

    async fn board(&self, chat_id: &str) -> Result<ChatBoard, EntityError> {
        if !self.store.exists(chat_id).await? {
            return Err(chat_not_found());
        }
        self.store
            .get_state(chat_id)
            .await
            .map_err(EntityError::lookup("chat"))
    }

    pub async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, EntityError> {
        Ok(self.board(chat_id).await?.messages)
    }

    /// Append `text` from `user_id` and an assistant reply in one update.
    pub async fn send_message(
        &self,
        chat_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<SentMessages, EntityError> {
        let user_id = user_id.trim();
        let text = text.trim();
        if user_id.is_empty() || text.is_empty() {
            return Err(EntityError::BadRequest("userId and text required".to_string()));
        }

        let board = self.board(chat_id).await?;
        let asked_at = Timestamp::now().as_millisecond();
        let patient = self.grounding_patient(&board).await?;
        let reply = self.compose_reply(patient.as_ref(), text).await;
        let replied_at = Timestamp::now().as_millisecond();

        let user_msg_id = new_message_id();
        let ai_msg_id = new_message_id();
        let mut sent = None;

        self.store
            .update(chat_id, |mut board| {
                let user_ts = asked_at.max(board.last_ts());
                let user_msg = ChatMessage {
                    id: user_msg_id.clone(),
                    chat_id: board.id.clone(),
                    user_id: user_id.to_string(),
                    text: text.to_string(),
                    ts: user_ts,
                };
                let ai_msg = ChatMessage {
                    id: ai_msg_id.clone(),
                    chat_id: board.id.clone(),
                    user_id: BOT_USER_ID.to_string(),
                    text: reply.clone(),
                    ts: replied_at.max(user_ts),
                };
                board.messages.push(user_msg.clone());
                board.messages.push(ai_msg.clone());
                sent = Some(SentMessages { user_msg, ai_msg });
                board
            })
            .await
            .map_err(EntityError::lookup("chat"))?;

        info!(chat_id, user_id, "message sent");
        sent.ok_or_else(chat_not_found)
    }

    async fn grounding_patient(&self, board: &ChatBoard) -> Result<Option<Patient>, EntityError> {
        let Some(patient_id) = board.patient_id.as_deref() else {
            return Ok(None);
        };
        // Seeded chats reference seeded patients.
        self.patients.ensure_seed().await?;
        if !self.patients.exists(patient_id).await? {
            warn!(chat_id = %board.id, patient_id, "chat references a missing patient");
            return Ok(None);
        }
        Ok(Some(self.patients.get_state(patient_id).await?))
    }

    async fn compose_reply(&self, patient: Option<&Patient>, text: &str) -> String {
        if let Some(assistant) = &self.assistant {
            let prompt = build_chat_prompt(patient, text);
            match assistant.reply(CHAT_SYSTEM_PROMPT, &prompt).await {
                Ok(reply) => return reply,
                Err(e) => warn!(error = %e, "assistant reply failed, using fallback"),
            }
        }
        generate_record_aware_response(patient, text)
    }
}

fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn chat_not_found() -> EntityError {
    EntityError::NotFound("chat not found".to_string())
}
