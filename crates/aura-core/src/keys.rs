//! Storage key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of objects in the Aura bucket. Every record lives in its own
//! partition under `entities/<kind>/<id>/`; blobs share that partition so a
//! record and its binary payloads are always addressed together.

use crate::error::CoreError;

pub const ENTITIES_PREFIX: &str = "entities/";

pub const INDEX_PREFIX: &str = "_index/";

/// Blob key prefix for evidence images inside a patient partition.
pub const EVIDENCE_IMAGE_PREFIX: &str = "evimg:";

/// Reject ids that would escape their partition or collapse into the parent.
pub fn validate_segment(segment: &str) -> Result<&str, CoreError> {
    if segment.is_empty() || segment.contains('/') || segment == "." || segment == ".." {
        return Err(CoreError::InvalidKeySegment(segment.to_string()));
    }
    Ok(segment)
}

pub fn partition_prefix(kind: &str, id: &str) -> String {
    format!("{ENTITIES_PREFIX}{kind}/{id}/")
}

pub fn entity_state(kind: &str, id: &str) -> String {
    format!("{ENTITIES_PREFIX}{kind}/{id}/state.json")
}

pub fn blobs_prefix(kind: &str, id: &str) -> String {
    format!("{ENTITIES_PREFIX}{kind}/{id}/blobs/")
}

pub fn blob(kind: &str, id: &str, blob_key: &str) -> String {
    format!("{ENTITIES_PREFIX}{kind}/{id}/blobs/{blob_key}")
}

pub fn index(name: &str) -> String {
    format!("{INDEX_PREFIX}{name}.json")
}

pub fn evidence_image(evidence_id: &str) -> String {
    format!("{EVIDENCE_IMAGE_PREFIX}{evidence_id}")
}
