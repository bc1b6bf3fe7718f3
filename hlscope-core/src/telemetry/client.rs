//! HTTP client for the market-data info endpoint
//!
//! Every query is a POST of `{"type": ..., "user": ...}` to `<base>/info`.
//! Transport errors, non-JSON content types and error statuses are all
//! reported as [`Error::Upstream`] so the aggregator can substitute fallbacks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::types::{InfoKind, InfoRequest};

/// Source of raw info-endpoint responses.
///
/// [`InfoClient`] is the production implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait InfoSource: Send + Sync {
    /// Run one query for `user` and return the decoded JSON body.
    async fn query(&self, kind: InfoKind, user: &str) -> Result<Value>;
}

/// HTTP client for the info endpoint
pub struct InfoClient {
    http_client: reqwest::Client,
    info_url: String,
}

impl InfoClient {
    /// Create a new client from network configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            info_url: config.info_url(),
        })
    }

    /// Endpoint this client posts to
    pub fn info_url(&self) -> &str {
        &self.info_url
    }
}

#[async_trait]
impl InfoSource for InfoClient {
    async fn query(&self, kind: InfoKind, user: &str) -> Result<Value> {
        let response = self
            .http_client
            .post(&self.info_url)
            .json(&InfoRequest { kind, user })
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("{} request failed: {}", kind, e)))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_json_content_type(&content_type) {
            return Err(Error::Upstream(format!(
                "{} returned non-JSON response ({}, content-type {:?})",
                kind, status, content_type
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Upstream(format!(
                "{} API error ({}): {}",
                kind, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("failed to parse {} response: {}", kind, e)))
    }
}

/// Whether a `Content-Type` header value declares JSON
fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}
