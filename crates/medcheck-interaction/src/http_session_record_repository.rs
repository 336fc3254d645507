//! Remote session record store backed by `POST /save-session`.

use crate::endpoint::{build_client, endpoint, parse_base_url};
use crate::wire::{SaveSessionResponse, error_message};
use async_trait::async_trait;
use medcheck_core::config::BackendConfig;
use medcheck_core::session::{SessionReceipt, SessionRecordRepository, SessionSnapshot};
use medcheck_core::{CheckerError, Result};
use reqwest::{Client, Url};
use std::time::Duration;

/// Sends finalized sessions to the backend's save-session route.
#[derive(Clone)]
pub struct HttpSessionRecordRepository {
    client: Client,
    endpoint: Url,
}

impl HttpSessionRecordRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint(&base, &["save-session"])?,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }
}

#[async_trait]
impl SessionRecordRepository for HttpSessionRecordRepository {
    async fn append(&self, snapshot: &SessionSnapshot) -> Result<SessionReceipt> {
        tracing::debug!(
            session_id = %snapshot.session_id,
            url = %self.endpoint,
            "[HttpSessionRecordRepository] Saving session"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(snapshot)
            .send()
            .await
            .map_err(|err| CheckerError::storage(format!("save-session request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CheckerError::storage(format!("Failed to read save-session response: {err}")))?;

        if !status.is_success() {
            return Err(CheckerError::storage(format!(
                "save-session failed with {status}: {}",
                error_message(&body)
            )));
        }

        // The acknowledgement body is informational; an unreadable one still means saved.
        let parsed = serde_json::from_str::<SaveSessionResponse>(&body).ok();
        let (message, session_id) = match parsed {
            Some(resp) => (resp.message, resp.session_id),
            None => (None, None),
        };

        Ok(SessionReceipt {
            message: message.unwrap_or_else(|| "Session saved".to_string()),
            session_id: session_id.unwrap_or_else(|| snapshot.session_id.clone()),
        })
    }
}
