//! Medical data carried through a session.
//!
//! These are the shapes exchanged with the reasoning service. Field names use
//! camelCase on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

/// Patient sex as collected by the intake step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sex {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
    #[serde(alias = "Other", alias = "OTHER")]
    Other,
}

/// Likelihood tier the reasoning service attaches to a candidate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Probability {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

/// Demographics captured by the intake step. Immutable once committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub age: u32,
    pub sex: Sex,
}

/// A candidate condition returned by symptom analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Backend-assigned identifier. Falls back to `name` when the backend omits it.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub probability: Probability,
    #[serde(default)]
    pub description: String,
}

impl Condition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        probability: Probability,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            probability,
            description: description.into(),
        }
    }

    /// Fills in a missing id with the condition name.
    pub fn with_fallback_id(mut self) -> Self {
        if self.id.trim().is_empty() {
            self.id = self.name.clone();
        }
        self
    }

    /// Whether `identifier` refers to this condition, by id or by name.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        (!self.id.is_empty() && self.id == identifier) || self.name.eq_ignore_ascii_case(identifier)
    }
}

/// Gives every condition an id no other condition in the list shares.
///
/// Missing ids fall back to the name; a repeated id gets a `-2`, `-3`, ...
/// suffix. Order is preserved and ids that are already unique are untouched.
pub fn with_unique_ids(conditions: Vec<Condition>) -> Vec<Condition> {
    let mut taken: HashSet<String> = HashSet::with_capacity(conditions.len());
    conditions
        .into_iter()
        .map(Condition::with_fallback_id)
        .map(|mut condition| {
            if !taken.insert(condition.id.clone()) {
                let mut suffix = 2;
                let unique = loop {
                    let candidate = format!("{}-{suffix}", condition.id);
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                    suffix += 1;
                };
                taken.insert(unique.clone());
                condition.id = unique;
            }
            condition
        })
        .collect()
}

/// Backends emit ids as strings or numbers; both are kept as text.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Explanatory detail for a selected condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDetails {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub causes: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub complications: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
}

/// Treatment options for a selected condition.
///
/// The structure is owned by the reasoning service; the session only stores it
/// and hands it to presentation and recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreatmentInfo(serde_json::Value);

impl TreatmentInfo {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}
