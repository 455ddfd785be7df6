use axum::extract::State;

use aura_core::models::stats::DashboardStats;

use crate::routes::{ApiResult, ok};
use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    ok(patients.stats().await?)
}
