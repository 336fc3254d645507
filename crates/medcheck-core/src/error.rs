//! Error types for the symptom checker.

use crate::step::WizardStep;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every layer of the symptom checker.
///
/// Each variant corresponds to one recovery path: validation and step errors keep
/// the user on the current step, boundary errors (`NotFound`, `Upstream`) allow a
/// retry with the already-entered input intact, and `Busy` asks the caller to wait
/// for the pending request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckerError {
    /// Bad or missing local input. Never reaches the reasoning service.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The reasoning service has no data for the named condition.
    #[error("No data found for condition '{condition}'")]
    NotFound { condition: String },

    /// The reasoning service was unreachable, timed out, or answered with a
    /// payload missing required fields.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A step's precondition is violated.
    ///
    /// `redirect` names the step the wizard routed back to, if any.
    #[error("Cannot proceed from {step}: {reason}")]
    Step {
        step: WizardStep,
        reason: String,
        redirect: Option<WizardStep>,
    },

    /// A reasoning request is already in flight for this session.
    #[error("A request is already in progress for this session")]
    Busy,

    /// The session was torn down while a request was pending; its result was discarded.
    #[error("Session '{session_id}' was abandoned")]
    Abandoned { session_id: String },

    /// Session record storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(condition: impl Into<String>) -> Self {
        Self::NotFound {
            condition: condition.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a Step error without a redirect.
    pub fn step(step: WizardStep, reason: impl Into<String>) -> Self {
        Self::Step {
            step,
            reason: reason.into(),
            redirect: None,
        }
    }

    /// Creates a Step error for a navigation fault that routed the wizard elsewhere.
    pub fn rerouted(step: WizardStep, reason: impl Into<String>, redirect: WizardStep) -> Self {
        Self::Step {
            step,
            reason: reason.into(),
            redirect: Some(redirect),
        }
    }

    pub fn abandoned(session_id: impl Into<String>) -> Self {
        Self::Abandoned {
            session_id: session_id.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Self::Step { .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned { .. })
    }

    /// Whether repeating the same action unchanged may succeed.
    ///
    /// Boundary failures and `Busy` are transient; everything else needs
    /// different input or a different step first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::NotFound { .. } | Self::Busy)
    }

    /// The step the wizard was routed back to, for navigation faults.
    pub fn redirect(&self) -> Option<WizardStep> {
        match self {
            Self::Step { redirect, .. } => *redirect,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CheckerError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("JSON: {}", err))
    }
}

impl From<toml::de::Error> for CheckerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML: {}", err))
    }
}

/// A type alias for `Result<T, CheckerError>`.
pub type Result<T> = std::result::Result<T, CheckerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(CheckerError::upstream("timeout").is_retryable());
        assert!(CheckerError::not_found("Flu").is_retryable());
        assert!(CheckerError::Busy.is_retryable());
        assert!(!CheckerError::validation("empty").is_retryable());
        assert!(!CheckerError::step(WizardStep::Intake, "immutable").is_retryable());
    }

    #[test]
    fn test_redirect_only_for_rerouted_step_errors() {
        let err = CheckerError::rerouted(
            WizardStep::DetailsAndTreatment,
            "no condition selected",
            WizardStep::ConditionSelection,
        );
        assert_eq!(err.redirect(), Some(WizardStep::ConditionSelection));
        assert_eq!(CheckerError::step(WizardStep::Analysis, "x").redirect(), None);
        assert_eq!(CheckerError::Busy.redirect(), None);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CheckerError::not_found("Unknown Condition").to_string(),
            "No data found for condition 'Unknown Condition'"
        );
        assert_eq!(
            CheckerError::step(WizardStep::ConditionSelection, "no conditions").to_string(),
            "Cannot proceed from condition selection: no conditions"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CheckerError = io.into();
        assert!(matches!(err, CheckerError::Storage(ref m) if m.contains("PermissionDenied")));
    }
}
