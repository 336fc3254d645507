//! HttpReasoningClient - REST implementation of the reasoning service contract.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `POST analyze` with `{age, sex, symptoms}` → `{conditions: [...]}`
//! - `GET condition-details/{name}` → `{details: {...}}`
//! - `GET treatments/{name}` → `{treatments: ...}`

use crate::endpoint::{build_client, endpoint, parse_base_url};
use crate::wire::{ConditionsEnvelope, DetailsEnvelope, TreatmentsEnvelope, error_message};
use async_trait::async_trait;
use medcheck_core::config::BackendConfig;
use medcheck_core::reasoning::{AnalyzeRequest, ReasoningClient};
use medcheck_core::session::{Condition, ConditionDetails, TreatmentInfo};
use medcheck_core::{CheckerError, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Reasoning client that talks to the backend over HTTP.
///
/// Performs one request per call; retrying is left to the caller.
#[derive(Clone)]
pub struct HttpReasoningClient {
    client: Client,
    base_url: Url,
}

impl HttpReasoningClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and returns the successful response body as text.
    ///
    /// `condition_name` is set for lookups keyed by a condition, so that a 404
    /// can be reported as `NotFound` for that name.
    async fn send(
        &self,
        request: RequestBuilder,
        operation: &str,
        condition_name: Option<&str>,
    ) -> Result<String> {
        let response = request.send().await.map_err(|err| {
            let kind = if err.is_timeout() {
                "timed out"
            } else if err.is_connect() {
                "could not connect"
            } else {
                "failed"
            };
            CheckerError::upstream(format!("{operation} request {kind}: {err}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            CheckerError::upstream(format!("Failed to read {operation} response: {err}"))
        })?;

        if !status.is_success() {
            return Err(map_http_error(status, &body, operation, condition_name));
        }

        Ok(body)
    }

    async fn get_by_condition<T: DeserializeOwned>(
        &self,
        route: &str,
        condition_name: &str,
        operation: &str,
    ) -> Result<T> {
        if condition_name.trim().is_empty() {
            return Err(CheckerError::validation("Condition name is required"));
        }
        let url = endpoint(&self.base_url, &[route, condition_name])?;
        tracing::debug!(%url, condition = condition_name, "[HttpReasoningClient] {}", operation);

        let request = self.client.get(url).header("Accept", "application/json");
        let body = self.send(request, operation, Some(condition_name)).await?;
        parse_body(&body, operation)
    }
}

#[async_trait]
impl ReasoningClient for HttpReasoningClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Condition>> {
        let url = endpoint(&self.base_url, &["analyze"])?;
        tracing::debug!(%url, age = request.age, sex = %request.sex, "[HttpReasoningClient] analyze");

        let body = self
            .send(self.client.post(url).json(request), "analyze", None)
            .await?;
        let envelope: ConditionsEnvelope = parse_body(&body, "analyze")?;
        let conditions = envelope.conditions.ok_or_else(|| {
            CheckerError::upstream("analyze response is missing the 'conditions' field")
        })?;

        tracing::debug!(count = conditions.len(), "[HttpReasoningClient] analyze returned");
        Ok(conditions)
    }

    async fn fetch_details(&self, condition_name: &str) -> Result<ConditionDetails> {
        let envelope: DetailsEnvelope = self
            .get_by_condition("condition-details", condition_name, "condition details")
            .await?;
        envelope.details.ok_or_else(|| {
            CheckerError::upstream("condition details response is missing the 'details' field")
        })
    }

    async fn fetch_treatments(&self, condition_name: &str) -> Result<TreatmentInfo> {
        let envelope: TreatmentsEnvelope = self
            .get_by_condition("treatments", condition_name, "treatments")
            .await?;
        envelope.treatments.map(TreatmentInfo::new).ok_or_else(|| {
            CheckerError::upstream("treatments response is missing the 'treatments' field")
        })
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, operation: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| CheckerError::upstream(format!("Malformed {operation} response: {err}")))
}

/// Maps a non-success status onto the error taxonomy.
fn map_http_error(
    status: StatusCode,
    body: &str,
    operation: &str,
    condition_name: Option<&str>,
) -> CheckerError {
    let message = error_message(body);
    match (status, condition_name) {
        (StatusCode::BAD_REQUEST, _) => CheckerError::validation(message),
        (StatusCode::NOT_FOUND, Some(name)) => CheckerError::not_found(name),
        _ => CheckerError::upstream(format!("{operation} failed with {status}: {message}")),
    }
}
