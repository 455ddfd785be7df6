use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const IMAGE: &str = "image";

pub const DOCUMENT: &str = "document";

/// A lab result, scan, or document attached to a patient's clinical record.
///
/// Image evidence has a companion blob stored under
/// [`crate::keys::evidence_image`] in the patient's partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Evidence {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub date: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub media_type: Option<String>,
}

impl Evidence {
    pub fn is_image(&self) -> bool {
        self.kind == IMAGE
    }
}

/// URL the UI uses to fetch the raw bytes of an image evidence item.
pub fn image_url(patient_id: &str, evidence_id: &str) -> String {
    format!("/api/patients/{patient_id}/evidence/{evidence_id}/image")
}
