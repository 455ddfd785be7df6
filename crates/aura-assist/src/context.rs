//! Patient context builder for chat prompts.
//!
//! Projects a patient record into a compact text block the generative model
//! can be grounded on. Pure: the same patient always yields the same text.

use aura_core::models::patient::{Patient, TreatmentStatus};

/// Build a structured context block summarizing `patient`.
pub fn format_patient_context(patient: &Patient) -> String {
    let record = &patient.clinical_record;
    let mut block = String::from("<patient_context>\n");

    block.push_str(&format!(
        "Patient: {} ({} y/o, {:?})\n",
        patient.name, patient.age, patient.gender
    ));
    block.push_str(&format!("MRN: {}\n", patient.mrn));
    block.push_str(&format!("Status: {}\n", patient.status.as_str()));
    block.push_str(&format!(
        "Primary diagnosis: {} - {}\n",
        patient.primary_diagnosis.code, patient.primary_diagnosis.description
    ));
    block.push_str(&format!("Last visit: {}\n", patient.last_visit));

    if !record.history.is_empty() {
        let items: Vec<String> = record
            .history
            .iter()
            .map(|h| format!("{} ({:?}, {})", h.condition, h.status, h.date))
            .collect();
        block.push_str(&format!("History: {}\n", items.join("; ")));
    }

    let active: Vec<String> = record
        .medications
        .iter()
        .filter(|m| m.status == TreatmentStatus::Active)
        .map(|m| format!("{} {}", m.name, m.dosage))
        .collect();
    if !active.is_empty() {
        block.push_str(&format!("Active medications: {}\n", active.join("; ")));
    }

    if let Some(v) = record.vitals.last() {
        block.push_str(&format!(
            "Latest vitals ({}): BP {}, HR {}, Temp {:.1}, SpO2 {}%, Weight {:.1} kg\n",
            v.recorded_at, v.bp, v.hr, v.temp, v.spo2, v.weight
        ));
    }

    for e in &record.evidence {
        block.push_str(&format!("Evidence [{}] {}", e.kind, e.name));
        if let Some(analysis) = &e.analysis {
            block.push_str(&format!(": {analysis}"));
        }
        block.push('\n');
    }

    block.push_str("</patient_context>");
    block
}

/// Full user message sent to the model: patient context (if any) then the question.
pub fn build_chat_prompt(patient: Option<&Patient>, query: &str) -> String {
    match patient {
        Some(p) => format!("{}\n\nQuestion: {query}", format_patient_context(p)),
        None => format!("No patient record is attached to this conversation.\n\nQuestion: {query}"),
    }
}
