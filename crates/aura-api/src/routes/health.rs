use axum::extract::State;
use serde::Serialize;

use crate::routes::{ApiResult, ok};
use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    storage: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Health> {
    ok(Health {
        status: "ok",
        storage: state.backend,
    })
}
