//! Deterministic responders.
//!
//! Used when no generative model is configured or the model call fails.
//! Every function here is pure and always returns non-empty text.

use aura_core::models::patient::{Patient, TreatmentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Vitals,
    Medications,
    History,
    Evidence,
    Diagnosis,
    Status,
    General,
}

// First match wins, so more specific topics come first.
const ROUTES: &[(Topic, &[&str])] = &[
    (
        Topic::Vitals,
        &["vital", "blood pressure", "bp", "heart rate", "pulse", "temp", "spo2", "oxygen", "weight"],
    ),
    (
        Topic::Medications,
        &["medication", "meds", "dosage", "dose", "prescri", "drug", "treatment"],
    ),
    (Topic::History, &["history", "past", "chronic", "previous"]),
    (
        Topic::Evidence,
        &["evidence", "lab", "image", "imaging", "scan", "x-ray", "xray", "report", "result"],
    ),
    (Topic::Diagnosis, &["diagnos", "icd", "condition"]),
    (Topic::Status, &["status", "how is", "doing", "stable", "urgent", "update"]),
];

fn route(query: &str) -> Topic {
    let q = query.to_lowercase();
    ROUTES
        .iter()
        .find(|(_, words)| words.iter().any(|w| contains_word(&q, w)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

// Short keywords like "bp" must match whole words; longer ones match as stems.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.len() > 3 || needle.contains(' ') {
        return haystack.contains(needle);
    }
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == needle)
}

/// Answer `query` from the patient record without a model.
pub fn generate_record_aware_response(patient: Option<&Patient>, query: &str) -> String {
    let Some(p) = patient else {
        return "I don't have a patient record attached to this conversation. \
                Open a chat from a patient's chart to ask about their vitals, \
                medications, history, or evidence."
            .to_string();
    };

    let first = first_name(&p.name);
    let record = &p.clinical_record;

    match route(query) {
        Topic::Vitals => match record.vitals.last() {
            Some(v) => format!(
                "{first}'s most recent vitals ({}): blood pressure {}, heart rate {} bpm, \
                 temperature {:.1}°C, SpO2 {}%, weight {:.1} kg.",
                v.recorded_at, v.bp, v.hr, v.temp, v.spo2, v.weight
            ),
            None => format!("No vitals have been recorded for {first} yet."),
        },
        Topic::Medications => {
            let active: Vec<String> = record
                .medications
                .iter()
                .filter(|m| m.status == TreatmentStatus::Active)
                .map(|m| format!("{} ({})", m.name, m.dosage))
                .collect();
            if active.is_empty() {
                format!("{first} has no active medications on record.")
            } else {
                format!("{first} is currently taking: {}.", active.join(", "))
            }
        }
        Topic::History => {
            if record.history.is_empty() {
                format!("No prior conditions are documented for {first}.")
            } else {
                let items: Vec<String> = record
                    .history
                    .iter()
                    .map(|h| format!("{} ({:?}, {})", h.condition, h.status, h.date))
                    .collect();
                format!("{first}'s documented history: {}.", items.join("; "))
            }
        }
        Topic::Evidence => {
            if record.evidence.is_empty() {
                format!("No labs, images, or documents have been attached to {first}'s record.")
            } else {
                let items: Vec<String> = record
                    .evidence
                    .iter()
                    .map(|e| match &e.analysis {
                        Some(a) => format!("{} [{}]: {a}", e.name, e.kind),
                        None => format!("{} [{}]", e.name, e.kind),
                    })
                    .collect();
                format!(
                    "{first}'s record has {} evidence item(s): {}",
                    record.evidence.len(),
                    items.join(" | ")
                )
            }
        }
        Topic::Diagnosis => format!(
            "{first}'s primary diagnosis is {} ({}).",
            p.primary_diagnosis.description, p.primary_diagnosis.code
        ),
        Topic::Status => format!(
            "{first} is currently marked {} with a primary diagnosis of {}. Last visit: {}.",
            p.status.as_str(),
            p.primary_diagnosis.description,
            p.last_visit
        ),
        Topic::General => format!(
            "{} ({} y/o, MRN {}) is {} under care for {}. The record lists {} active \
             medication(s), {} vitals reading(s), and {} evidence item(s). Ask about \
             vitals, medications, history, or evidence for details.",
            p.name,
            p.age,
            p.mrn,
            p.status.as_str(),
            p.primary_diagnosis.description,
            record
                .medications
                .iter()
                .filter(|m| m.status == TreatmentStatus::Active)
                .count(),
            record.vitals.len(),
            record.evidence.len()
        ),
    }
}

/// Placeholder analysis for an image the model could not review.
pub fn fallback_image_analysis(name: &str, media_type: &str, size_bytes: usize) -> String {
    format!(
        "Automated review unavailable. {name} ({media_type}, {:.1} KB) was stored for \
         clinician review; no findings were extracted.",
        size_bytes as f64 / 1024.0
    )
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("The patient")
}
