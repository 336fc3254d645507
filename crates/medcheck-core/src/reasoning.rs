//! Contract with the external medical reasoning service.
//!
//! `ReasoningClient` is the capability the wizard depends on. The HTTP
//! implementation lives in `medcheck-interaction`; tests substitute an
//! in-memory double.

use crate::error::{CheckerError, Result};
use crate::session::{Condition, ConditionDetails, Sex, TreatmentInfo};
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Body of an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub age: u32,
    pub sex: Sex,
    pub symptoms: String,
}

/// The three operations offered by the reasoning service.
///
/// Implementations perform exactly one request per call and never retry.
/// Errors are mapped onto the shared taxonomy:
///
/// - bad input detected locally or reported as 400 → `Validation`
/// - the service has no data for a condition name → `NotFound`
/// - unreachable, timed out, or a payload missing its field → `Upstream`
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Returns candidate conditions for the given symptoms.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Condition>>;

    /// Returns detail for a condition, keyed by its (already decoded) name.
    async fn fetch_details(&self, condition_name: &str) -> Result<ConditionDetails>;

    /// Returns treatment options for a condition, keyed by its (already decoded) name.
    async fn fetch_treatments(&self, condition_name: &str) -> Result<TreatmentInfo>;
}

/// Checks symptom text before any request is made.
///
/// Returns the trimmed text.
pub fn require_symptoms(symptoms: &str) -> Result<&str> {
    let trimmed = symptoms.trim();
    if trimmed.is_empty() {
        return Err(CheckerError::validation("Please enter your symptoms"));
    }
    Ok(trimmed)
}

/// Prepares a condition name for a detail or treatment lookup.
///
/// The name is percent-decoded exactly once (a plain name decodes to itself) and
/// otherwise left untouched.
pub fn normalize_condition_name(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(CheckerError::validation("Condition name is required"));
    }
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| CheckerError::validation(format!("Condition name is not valid UTF-8: {e}")))?;
    if decoded.trim().is_empty() {
        return Err(CheckerError::validation("Condition name is required"));
    }
    Ok(decoded.into_owned())
}
