//! HTTP client wrapper for the eCFR API.

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// User agent string identifying this backend.
const USER_AGENT: &str = concat!("ecfr-backend/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout` - Per-request timeout; `None` leaves requests unbounded
///
/// # Returns
/// A `reqwest::Client` configured with the timeout and user agent.
pub fn create_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Upstream eCFR API: a shared client plus the base URL it talks to.
///
/// Cloning is cheap; `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct EcfrClient {
    client: Client,
    base_url: String,
}

impl EcfrClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download a URL, failing on connection errors and non-2xx statuses.
    ///
    /// No retries: a failed fetch is reported to the caller as-is.
    pub async fn download_bytes(&self, url: &str, accept: &'static str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching upstream");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Download a URL and decode its JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let bytes = self.download_bytes(url, "application/json").await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
