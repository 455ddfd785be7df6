use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub census: u32,
    pub urgent_count: u32,
    pub discharged_today: u32,
    pub volume_trend: i32,
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActivityItem {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub patient_avatar: Option<String>,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub description: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ActivityType {
    #[serde(rename = "Status Change")]
    StatusChange,
    #[serde(rename = "New Diagnosis")]
    NewDiagnosis,
    #[serde(rename = "Treatment Started")]
    TreatmentStarted,
    #[serde(rename = "Lab Upload")]
    LabUpload,
}
