use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use aura_core::models::page::Page;
use aura_core::models::patient::Patient;

use crate::routes::{ApiResult, PageQuery, ok};
use crate::state::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Patient>> {
    let Query(query) = query?;
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    ok(patients.list(query.cursor(), query.limit).await?)
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Patient> {
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    ok(patients.get(&id).await?)
}
