//! Shared HTTP client for the deck generation API.
//!
//! Provides a minimal client with an optional bearer token, the envelope
//! decoder for the API gateway's dual response shape, and domain methods
//! (issue upload URL, presigned PUT, status query, browse). The CLI and the
//! workflow crate use this client directly.

pub mod api;
pub mod envelope;

use std::time::Duration;

use deckgen_core::{AppError, ClientConfig};
use reqwest::Client;

pub use envelope::{decode_body, ResponseShape};

/// HTTP client for the deck generation API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Internal(format!("Failed to create HTTP client: {}", err)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create a client from a loaded configuration, attaching the session
    /// token when one is supplied.
    pub fn from_config(config: &ClientConfig, token: Option<String>) -> Result<Self, AppError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
            token,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Raw client for requests outside the API base URL (the presigned PUT).
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
