use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::JudgeConfig;

/// Longest slice of an error body kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Network(String),
}

impl TransportError {
    pub fn status(status: u16, body: &str) -> Self {
        TransportError::Status {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }

    /// True when the service rejected the API key itself.
    pub fn is_credential_error(&self) -> bool {
        match self {
            TransportError::Status { status: 401 | 403, .. } => true,
            TransportError::Status { status: 400, body } => {
                body.contains("API_KEY_INVALID") || body.contains("API key not valid")
            }
            _ => false,
        }
    }
}

/// One request/response exchange with a generative-text service.
///
/// Implementations return the raw response body; interpreting it is the
/// caller's job.
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    async fn generate(&self, body: &Value) -> Result<String, TransportError>;
}

/// `generateContent` over HTTPS, API key in the query string.
pub struct GeminiTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &JudgeConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl GenerativeTransport for GeminiTransport {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn generate(&self, body: &Value) -> Result<String, TransportError> {
        // reqwest errors embed the full URL; strip it so the key never reaches a log line.
        let res = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &text));
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Generative service responded");
        Ok(text)
    }
}
