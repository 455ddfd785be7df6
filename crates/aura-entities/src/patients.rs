//! Patient records: dashboard stats and the evidence workflow.
//!
//! Evidence items live inside the patient record; image payloads live as blobs
//! in the same partition under `evimg:<evidenceId>`. Every change to the
//! evidence array is a single compare-and-swap `modify` on the record, so
//! concurrent edits to sibling items never clobber each other.

use jiff::Timestamp;
use tracing::{info, warn};

use aura_assist::client::Assistant;
use aura_assist::respond::fallback_image_analysis;
use aura_core::keys;
use aura_core::models::evidence::{self, Evidence};
use aura_core::models::page::Page;
use aura_core::models::patient::{Patient, PatientStatus};
use aura_core::models::stats::{ActivityItem, ActivityType, DashboardStats};
use aura_storage::entity::{EntityStore, SeedOutcome};
use aura_storage::state::Change;

use crate::error::EntityError;

/// Patients scanned for dashboard stats.
pub const STATS_SCAN_LIMIT: usize = 100;

const ACTIVITY_FEED_LEN: usize = 5;
const ACTIVITY_SPACING_MS: i64 = 11 * 60 * 1000;
const VOLUME_TREND: i32 = 12;

const DEFAULT_DOCUMENT_NAME: &str = "Clinical Document";

#[derive(Clone)]
pub struct Patients {
    store: EntityStore<Patient>,
    assistant: Option<Assistant>,
}

impl Patients {
    pub fn new(store: EntityStore<Patient>, assistant: Option<Assistant>) -> Self {
        Self { store, assistant }
    }

    pub fn store(&self) -> &EntityStore<Patient> {
        &self.store
    }

    pub async fn ensure_seed(&self) -> Result<SeedOutcome, EntityError> {
        Ok(self.store.ensure_seed().await?)
    }

    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<Patient>, EntityError> {
        Ok(self.store.list(cursor, limit).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Patient, EntityError> {
        if !self.store.exists(id).await? {
            return Err(EntityError::NotFound("patient not found".to_string()));
        }
        self.store
            .get_state(id)
            .await
            .map_err(EntityError::lookup("patient"))
    }

    pub async fn stats(&self) -> Result<DashboardStats, EntityError> {
        self.stats_at(Timestamp::now()).await
    }

    pub async fn stats_at(&self, now: Timestamp) -> Result<DashboardStats, EntityError> {
        let patients = self.store.collect(STATS_SCAN_LIMIT).await?;
        Ok(build_stats(&patients, now))
    }

    /// Append `item`. Fails with `BadRequest` if its id is already present.
    pub async fn add_evidence(&self, patient_id: &str, item: Evidence) -> Result<Patient, EntityError> {
        let mut duplicate = false;
        let patient = self
            .store
            .modify(patient_id, |mut p| {
                duplicate = p.evidence(&item.id).is_some();
                if duplicate {
                    return Change::Keep(p);
                }
                p.clinical_record.evidence.push(item.clone());
                Change::Write(p)
            })
            .await
            .map_err(EntityError::lookup("patient"))?;

        if duplicate {
            return Err(EntityError::BadRequest(format!(
                "evidence {} already exists",
                item.id
            )));
        }
        Ok(patient)
    }

    /// Remove evidence `evidence_id` and return it.
    pub async fn remove_evidence(
        &self,
        patient_id: &str,
        evidence_id: &str,
    ) -> Result<Evidence, EntityError> {
        let mut removed = None;
        self.store
            .modify(patient_id, |mut p| {
                let evidence = &mut p.clinical_record.evidence;
                removed = evidence
                    .iter()
                    .position(|e| e.id == evidence_id)
                    .map(|at| evidence.remove(at));
                match removed {
                    Some(_) => Change::Write(p),
                    None => Change::Keep(p),
                }
            })
            .await
            .map_err(EntityError::lookup("patient"))?;

        removed.ok_or_else(evidence_not_found)
    }

    /// Apply `f` to evidence `evidence_id` in place and return the result.
    pub async fn update_evidence<F>(
        &self,
        patient_id: &str,
        evidence_id: &str,
        mut f: F,
    ) -> Result<Evidence, EntityError>
    where
        F: FnMut(&mut Evidence),
    {
        let mut updated = None;
        self.store
            .modify(patient_id, |mut p| {
                updated = p
                    .clinical_record
                    .evidence
                    .iter_mut()
                    .find(|e| e.id == evidence_id)
                    .map(|e| {
                        f(e);
                        e.clone()
                    });
                match updated {
                    Some(_) => Change::Write(p),
                    None => Change::Keep(p),
                }
            })
            .await
            .map_err(EntityError::lookup("patient"))?;

        updated.ok_or_else(evidence_not_found)
    }

    /// Attach a document-style evidence item that has no binary payload.
    pub async fn create_document_evidence(
        &self,
        patient_id: &str,
        name: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Evidence, EntityError> {
        let kind = non_blank(kind).unwrap_or(evidence::DOCUMENT);
        if kind == evidence::IMAGE {
            return Err(EntityError::BadRequest(
                "image evidence must be uploaded with its file".to_string(),
            ));
        }

        let id = new_evidence_id();
        let item = Evidence {
            url: format!("#evidence-{id}"),
            name: non_blank(name).unwrap_or(DEFAULT_DOCUMENT_NAME).to_string(),
            kind: kind.to_string(),
            date: Timestamp::now(),
            analysis: None,
            media_type: None,
            id,
        };
        self.add_evidence(patient_id, item.clone()).await?;
        info!(patient_id, evidence_id = %item.id, kind = %item.kind, "document evidence added");
        Ok(item)
    }

    /// Analyze and store an uploaded image, then record it as evidence.
    pub async fn attach_image(
        &self,
        patient_id: &str,
        name: &str,
        media_type: &str,
        bytes: &[u8],
    ) -> Result<Evidence, EntityError> {
        if !media_type.to_ascii_lowercase().starts_with("image/") {
            return Err(EntityError::BadRequest(format!(
                "expected an image upload, got {media_type}"
            )));
        }
        if bytes.is_empty() {
            return Err(EntityError::BadRequest("uploaded image is empty".to_string()));
        }
        // Fail fast before spending a model call on an unknown patient.
        if !self.store.exists(patient_id).await? {
            return Err(EntityError::NotFound("patient not found".to_string()));
        }

        let id = new_evidence_id();
        let blob_key = keys::evidence_image(&id);
        let analysis = self.analyze_image(name, media_type, bytes).await;

        let blobs = self.store.blobs(patient_id)?;
        blobs.put_blob(&blob_key, bytes).await?;

        let item = Evidence {
            url: evidence::image_url(patient_id, &id),
            name: name.to_string(),
            kind: evidence::IMAGE.to_string(),
            date: Timestamp::now(),
            analysis: Some(analysis),
            media_type: Some(media_type.to_string()),
            id,
        };

        if let Err(e) = self.add_evidence(patient_id, item.clone()).await {
            if let Err(cleanup) = blobs.del_blob(&blob_key).await {
                warn!(patient_id, blob_key = %blob_key, error = %cleanup, "orphaned evidence blob");
            }
            return Err(e);
        }

        info!(patient_id, evidence_id = %item.id, size = bytes.len(), "image evidence added");
        Ok(item)
    }

    /// Stored media type and bytes of an image evidence item.
    pub async fn evidence_image(
        &self,
        patient_id: &str,
        evidence_id: &str,
    ) -> Result<(String, Vec<u8>), EntityError> {
        let patient = self.get(patient_id).await?;
        let item = patient.evidence(evidence_id).ok_or_else(evidence_not_found)?;
        if !item.is_image() {
            return Err(EntityError::BadRequest(format!(
                "evidence {evidence_id} has no image"
            )));
        }
        let media_type = item
            .media_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = self
            .store
            .blobs(patient_id)?
            .get_blob(&keys::evidence_image(evidence_id))
            .await?
            .ok_or_else(|| EntityError::NotFound("evidence image not found".to_string()))?;
        Ok((media_type, bytes))
    }

    /// Re-run analysis on a stored image. Only `analysis` changes.
    pub async fn reanalyze_evidence(
        &self,
        patient_id: &str,
        evidence_id: &str,
    ) -> Result<Evidence, EntityError> {
        let patient = self.get(patient_id).await?;
        let item = patient.evidence(evidence_id).ok_or_else(evidence_not_found)?;
        if !item.is_image() {
            return Err(EntityError::BadRequest(
                "only image evidence can be reanalyzed".to_string(),
            ));
        }
        let name = item.name.clone();

        let (media_type, bytes) = self.evidence_image(patient_id, evidence_id).await?;
        let analysis = self.analyze_image(&name, &media_type, &bytes).await;

        self.update_evidence(patient_id, evidence_id, |e| {
            e.analysis = Some(analysis.clone());
        })
        .await
    }

    /// Remove an evidence item, then its image blob if it had one.
    pub async fn delete_evidence(
        &self,
        patient_id: &str,
        evidence_id: &str,
    ) -> Result<Evidence, EntityError> {
        let removed = self.remove_evidence(patient_id, evidence_id).await?;
        if removed.is_image() {
            let deleted = self
                .store
                .blobs(patient_id)?
                .del_blob(&keys::evidence_image(evidence_id))
                .await?;
            if !deleted {
                warn!(patient_id, evidence_id, "image evidence had no blob");
            }
        }
        info!(patient_id, evidence_id, "evidence deleted");
        Ok(removed)
    }

    /// Model analysis of an image, or the deterministic placeholder when the
    /// model is unavailable or fails.
    pub async fn analyze_image(&self, name: &str, media_type: &str, bytes: &[u8]) -> String {
        if let Some(assistant) = &self.assistant {
            let prompt = format!("Clinical image attached to a patient record: {name}.");
            match assistant.describe_image(bytes, media_type, &prompt).await {
                Ok(text) => return text,
                Err(e) => warn!(name, media_type, error = %e, "image analysis failed, using fallback"),
            }
        }
        fallback_image_analysis(name, media_type, bytes.len())
    }
}

/// Dashboard stats over `patients`.
///
/// The activity feed is synthetic: ids and timestamps derive from the patient
/// id and the hour containing `now`, so polling within one hour is stable.
pub fn build_stats(patients: &[Patient], now: Timestamp) -> DashboardStats {
    let count = |status: PatientStatus| patients.iter().filter(|p| p.status == status).count() as u32;
    let urgent_count = count(PatientStatus::Urgent);
    let discharged_today = count(PatientStatus::Discharged);

    let hour = now.as_second().div_euclid(3600);
    let hour_start_ms = hour * 3600 * 1000;

    let recent_activity = patients
        .iter()
        .take(ACTIVITY_FEED_LEN)
        .enumerate()
        .map(|(i, p)| ActivityItem {
            id: format!("act-{}-{hour}", p.id),
            patient_id: p.id.clone(),
            patient_name: p.name.clone(),
            patient_avatar: (!p.avatar_url.is_empty()).then(|| p.avatar_url.clone()),
            kind: ActivityType::StatusChange,
            description: format!("Patient status updated to {}", p.status.as_str()),
            timestamp: hour_start_ms - (i as i64 + 1) * ACTIVITY_SPACING_MS,
        })
        .collect();

    DashboardStats {
        census: patients.len() as u32 - discharged_today,
        urgent_count,
        discharged_today,
        volume_trend: VOLUME_TREND,
        recent_activity,
    }
}

fn new_evidence_id() -> String {
    format!("ev-{}", uuid::Uuid::new_v4().simple())
}

fn evidence_not_found() -> EntityError {
    EntityError::NotFound("evidence not found".to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
