//! Response envelopes of the reasoning service.
//!
//! Every field is optional here so that a missing field can be reported as an
//! upstream fault instead of a generic parse error.

use medcheck_core::session::{Condition, ConditionDetails};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionsEnvelope {
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsEnvelope {
    pub details: Option<ConditionDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreatmentsEnvelope {
    pub treatments: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveSessionResponse {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

/// Error body: `{error, details}` from the reasoning routes, `{message, error}`
/// from the session routes.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
    message: Option<String>,
}

/// Extracts a readable message from an error response body.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() {
            "no error body".to_string()
        } else {
            trimmed.to_string()
        };
    };

    let parts: Vec<String> = [parsed.error, parsed.message, parsed.details]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();

    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join(": ")
    }
}
