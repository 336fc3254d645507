//! Finalized session records.

use super::model::{Condition, ConditionDetails, Sex, TreatmentInfo};
use serde::{Deserialize, Serialize};

/// Read-only copy of a completed session, as handed to the recorder.
///
/// This is also the `POST /save-session` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: String,
    pub completed_at: String,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub symptoms: String,
    pub conditions: Vec<Condition>,
    pub selected_condition: Option<Condition>,
    pub details: Option<ConditionDetails>,
    pub treatments: Option<TreatmentInfo>,
}

/// Acknowledgement from a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReceipt {
    pub message: String,
    pub session_id: String,
}
