use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evidence::Evidence;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Patient {
    pub id: String,
    pub mrn: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub status: PatientStatus,
    pub last_visit: jiff::Timestamp,
    pub primary_diagnosis: Diagnosis,
    pub ssn: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub clinical_record: ClinicalRecord,
}

impl Patient {
    pub fn evidence(&self, evidence_id: &str) -> Option<&Evidence> {
        self.clinical_record
            .evidence
            .iter()
            .find(|e| e.id == evidence_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PatientStatus {
    Urgent,
    Observation,
    #[default]
    Stable,
    Discharged,
}

impl PatientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Urgent => "Urgent",
            PatientStatus::Observation => "Observation",
            PatientStatus::Stable => "Stable",
            PatientStatus::Discharged => "Discharged",
        }
    }
}

/// ICD-10 coded diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Diagnosis {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalRecord {
    #[serde(default)]
    pub history: Vec<MedicalHistoryItem>,
    #[serde(default)]
    pub medications: Vec<Treatment>,
    #[serde(default)]
    pub vitals: Vec<Vitals>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicalHistoryItem {
    pub condition: String,
    pub date: String,
    pub status: HistoryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum HistoryStatus {
    Resolved,
    Chronic,
    #[serde(rename = "Under Treatment")]
    UnderTreatment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Treatment {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub dosage: String,
    pub status: TreatmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TreatmentStatus {
    Active,
    Completed,
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Vitals {
    pub bp: String,
    pub hr: u32,
    pub temp: f64,
    pub spo2: u32,
    pub weight: f64,
    pub recorded_at: jiff::Timestamp,
}
