use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use aura_core::models::page::Page;
use aura_core::models::user::User;

use crate::routes::{ApiResult, PageQuery, ok};
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<User>> {
    let Query(query) = query?;
    let users = &state.entities.users;
    users.ensure_seed().await?;
    ok(users.list(query.cursor(), query.limit).await?)
}
