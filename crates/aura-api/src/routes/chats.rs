use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use aura_core::models::chat::{Chat, ChatMessage, SentMessages};
use aura_core::models::page::Page;

use crate::routes::{ApiResult, PageQuery, ok};
use crate::state::AppState;

pub async fn list_chats(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Chat>> {
    let Query(query) = query?;
    let chats = &state.entities.chats;
    chats.ensure_seed().await?;
    ok(chats.list(query.cursor(), query.limit).await?)
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> ApiResult<Vec<ChatMessage>> {
    let chats = &state.entities.chats;
    chats.ensure_seed().await?;
    ok(chats.list_messages(&chat_id).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<SentMessages> {
    let Json(body) = body?;
    let chats = &state.entities.chats;
    chats.ensure_seed().await?;
    ok(chats.send_message(&chat_id, &body.user_id, &body.text).await?)
}
