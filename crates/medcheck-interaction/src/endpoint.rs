//! URL and client construction shared by the HTTP adapters.

use medcheck_core::{CheckerError, Result};
use reqwest::{Client, Url};
use std::time::Duration;

/// Parses the configured backend base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| CheckerError::config(format!("Invalid backend URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(CheckerError::config(format!(
            "Backend URL '{base_url}' cannot carry a path"
        )));
    }
    Ok(url)
}

/// Appends `segments` to `base`, percent-encoding each one as a single path segment.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CheckerError::config(format!("Backend URL '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CheckerError::config(format!("Failed to build HTTP client: {e}")))
}
