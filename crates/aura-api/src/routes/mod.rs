use axum::Json;
use serde::Deserialize;

use aura_core::models::response::ApiResponse;

use crate::error::ApiError;

pub mod chats;
pub mod dashboard;
pub mod evidence;
pub mod health;
pub mod patients;
pub mod users;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// `?cursor=&limit=` on list routes.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Empty `cursor=` means the first page.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}
