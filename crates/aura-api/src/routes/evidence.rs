use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use aura_core::models::evidence::Evidence;

use crate::error::ApiError;
use crate::routes::{ApiResult, ok};
use crate::state::AppState;

const UPLOAD_FIELDS: &[&str] = &["image", "file"];
const DEFAULT_UPLOAD_NAME: &str = "Uploaded Image";

#[derive(Debug, Default, Deserialize)]
pub struct NewEvidence {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn create_evidence(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    body: Result<Json<NewEvidence>, JsonRejection>,
) -> ApiResult<Evidence> {
    let Json(body) = body?;
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    let item = patients
        .create_document_evidence(&patient_id, body.name.as_deref(), body.kind.as_deref())
        .await?;
    ok(item)
}

pub async fn upload_image(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Evidence> {
    let mut multipart = multipart?;
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    while let Some(field) = multipart.next_field().await? {
        if !field.name().is_some_and(|n| UPLOAD_FIELDS.contains(&n)) {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_UPLOAD_NAME)
            .to_string();
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;

        let item = patients
            .attach_image(&patient_id, &name, &media_type, &bytes)
            .await?;
        return ok(item);
    }

    Err(ApiError::BadRequest(
        "multipart field `image` or `file` required".to_string(),
    ))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path((patient_id, evidence_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    let (media_type, bytes) = patients
        .evidence_image(&patient_id, &evidence_id)
        .await?;
    Ok(([(header::CONTENT_TYPE, media_type)], bytes).into_response())
}

pub async fn reanalyze(
    State(state): State<AppState>,
    Path((patient_id, evidence_id)): Path<(String, String)>,
) -> ApiResult<Evidence> {
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    let item = patients
        .reanalyze_evidence(&patient_id, &evidence_id)
        .await?;
    ok(item)
}

pub async fn delete_evidence(
    State(state): State<AppState>,
    Path((patient_id, evidence_id)): Path<(String, String)>,
) -> ApiResult<Evidence> {
    let patients = &state.entities.patients;
    patients.ensure_seed().await?;
    let item = patients
        .delete_evidence(&patient_id, &evidence_id)
        .await?;
    ok(item)
}
