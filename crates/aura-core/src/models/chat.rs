use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Author id of assistant replies.
pub const BOT_USER_ID: &str = "aura-bot";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Chat {
    pub id: String,
    pub title: String,
    /// Patient whose record grounds the conversation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub patient_id: Option<String>,
}

/// A chat together with its append-only message log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatBoard {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatBoard {
    pub fn summary(&self) -> Chat {
        Chat {
            id: self.id.clone(),
            title: self.title.clone(),
            patient_id: self.patient_id.clone(),
        }
    }

    /// Timestamp of the newest message, or 0 for an empty board.
    pub fn last_ts(&self) -> i64 {
        self.messages.last().map(|m| m.ts).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub user_id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

/// The user message and the assistant reply appended by one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SentMessages {
    pub user_msg: ChatMessage,
    pub ai_msg: ChatMessage,
}
