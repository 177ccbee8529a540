//! Shared HTTP transport for identity manager calls.

use crate::config::HttpClientConfig;
use crate::error::{OAuth2Error, OAuth2Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Pooled HTTP client shared by every [`OAuthClient`](crate::OAuthClient).
///
/// Built once at startup and handed around behind an `Arc`. Idle pooled
/// connections expire after `pool_idle_timeout_seconds` and are evicted by
/// the pool itself, so every call leaves the pool free of expired
/// connections whether it succeeded or not. Call [`shutdown`](Self::shutdown)
/// once during process teardown.
pub struct IdmHttpClient {
    client: Client,
    config: HttpClientConfig,
}

/// Status and raw body of an IdM response.
#[derive(Debug)]
pub(crate) struct IdmResponse {
    pub status: StatusCode,
    pub body: String,
}

impl IdmResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

impl IdmHttpClient {
    pub fn new(config: HttpClientConfig) -> OAuth2Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_seconds));

        if config.danger_accept_invalid_certs {
            warn!(
                "TLS certificate validation is disabled for identity manager connections; \
                 responses can be forged by anyone on the network path"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| OAuth2Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request and read the whole body.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<IdmResponse, reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Identity manager responded");
        Ok(IdmResponse { status, body })
    }

    /// Close the connection pool.
    pub fn shutdown(self) {
        debug!("Shutting down identity manager HTTP client");
        drop(self.client);
    }
}
