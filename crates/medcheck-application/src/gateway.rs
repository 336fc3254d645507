//! Guarded access to the reasoning service for one session run.
//!
//! `ReasoningGateway` wraps any `ReasoningClient` and adds what every call needs
//! regardless of transport: local input checks before the boundary, a bounded
//! timeout, and cancellation when the session is abandoned.

use medcheck_core::reasoning::{self, AnalyzeRequest, ReasoningClient};
use medcheck_core::session::{Condition, ConditionDetails, PatientProfile, TreatmentInfo, with_unique_ids};
use medcheck_core::{CheckerError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct ReasoningGateway {
    client: Arc<dyn ReasoningClient>,
    timeout: Duration,
    session_id: String,
    cancel: CancellationToken,
}

impl ReasoningGateway {
    pub fn new(
        client: Arc<dyn ReasoningClient>,
        timeout: Duration,
        session_id: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            timeout,
            session_id: session_id.into(),
            cancel,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_abandoned(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Analyzes symptoms for a patient.
    ///
    /// Blank symptoms fail with `Validation` before any request is made.
    /// Conditions without an id get their name as id, and repeated ids are
    /// suffixed so each candidate can be told apart.
    pub async fn analyze(&self, patient: &PatientProfile, symptoms: &str) -> Result<Vec<Condition>> {
        let symptoms = reasoning::require_symptoms(symptoms)?;
        let request = AnalyzeRequest {
            age: patient.age,
            sex: patient.sex,
            symptoms: symptoms.to_string(),
        };

        let conditions = self.guarded("analyze", self.client.analyze(&request)).await?;
        Ok(with_unique_ids(conditions))
    }

    pub async fn fetch_details(&self, condition_name: &str) -> Result<ConditionDetails> {
        let name = reasoning::normalize_condition_name(condition_name)?;
        self.guarded("fetch_details", self.client.fetch_details(&name)).await
    }

    pub async fn fetch_treatments(&self, condition_name: &str) -> Result<TreatmentInfo> {
        let name = reasoning::normalize_condition_name(condition_name)?;
        self.guarded("fetch_treatments", self.client.fetch_treatments(&name)).await
    }

    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(CheckerError::abandoned(&self.session_id));
        }

        tracing::debug!(session_id = %self.session_id, operation, "[ReasoningGateway] Calling reasoning service");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(session_id = %self.session_id, operation, "[ReasoningGateway] Session abandoned; discarding result");
                Err(CheckerError::abandoned(&self.session_id))
            }
            outcome = tokio::time::timeout(self.timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(CheckerError::upstream(format!(
                    "{operation} timed out after {}s",
                    self.timeout.as_secs_f32()
                ))),
            },
        }
    }
}
