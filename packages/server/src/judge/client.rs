use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uzcode_common::analysis::{STATUS_API_CALL_FAILED, STATUS_ERROR};
use uzcode_common::retry::RetryExhausted;
use uzcode_common::{AnalysisResult, RetryPolicy};

use super::decode::{self, DecodeError};
use super::prompt;
use super::transport::{GeminiTransport, GenerativeTransport, TransportError};
use crate::config::JudgeConfig;

/// Why a single judge attempt failed.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Every attempt failed. Carries the sentinel analysis describing the last failure.
#[derive(Debug)]
pub struct JudgeFailure {
    analysis: AnalysisResult,
    credential_error: bool,
    attempts: u32,
}

impl JudgeFailure {
    fn from_exhausted(exhausted: RetryExhausted<JudgeError>) -> Self {
        let RetryExhausted {
            attempts, error, ..
        } = exhausted;

        let credential_error = matches!(&error, JudgeError::Transport(t) if t.is_credential_error());
        let analysis = match &error {
            JudgeError::Transport(TransportError::Status { .. }) => AnalysisResult::sentinel(
                STATUS_API_CALL_FAILED,
                format!(
                    "API call failed after {attempts} attempts. Check API Key and configuration: {error}"
                ),
            ),
            _ => AnalysisResult::sentinel(
                STATUS_ERROR,
                format!("AI Judge failed to process structured output: {error}"),
            ),
        };

        Self {
            analysis,
            credential_error,
            attempts,
        }
    }

    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    pub fn into_analysis(self) -> AnalysisResult {
        self.analysis
    }

    /// The service rejected our API key on the final attempt.
    pub fn is_credential_error(&self) -> bool {
        self.credential_error
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Client for the external AI judge.
///
/// Stateless apart from the transport's connection pool; share it behind an `Arc`.
pub struct JudgeClient {
    transport: Arc<dyn GenerativeTransport>,
    retry: RetryPolicy,
}

impl JudgeClient {
    pub fn new(transport: Arc<dyn GenerativeTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn from_config(config: &JudgeConfig) -> reqwest::Result<Self> {
        let transport = GeminiTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), retry_policy(config)))
    }

    pub fn transport(&self) -> Arc<dyn GenerativeTransport> {
        Arc::clone(&self.transport)
    }

    /// Ask the judge to assess `code` against `problem_description`.
    ///
    /// Transport and decode failures are retried. A response that decodes
    /// cleanly is returned as-is, even if its status is a sentinel.
    #[instrument(skip_all, fields(code_len = code.len()))]
    pub async fn judge(
        &self,
        code: &str,
        problem_description: &str,
    ) -> Result<AnalysisResult, JudgeFailure> {
        let payload = prompt::judge_request(code, problem_description);
        let transport = &self.transport;
        let payload = &payload;

        let outcome = self
            .retry
            .run(|attempt| async move {
                debug!(attempt, "Sending judge request");
                let body = transport.generate(payload).await?;
                let analysis = decode::decode_analysis(&body)?;
                Ok::<_, JudgeError>(analysis)
            })
            .await;

        match outcome {
            Ok(analysis) => {
                info!(status = %analysis.status, "Judge returned analysis");
                Ok(analysis)
            }
            Err(exhausted) => {
                let failure = JudgeFailure::from_exhausted(exhausted);
                warn!(
                    attempts = failure.attempts(),
                    status = %failure.analysis().status,
                    credential_error = failure.is_credential_error(),
                    "Judge gave up"
                );
                Err(failure)
            }
        }
    }
}

pub fn retry_policy(config: &JudgeConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.max_attempts,
        Duration::from_millis(config.backoff_unit_ms),
    )
}
