//! Turns a raw `generateContent` response body into an `AnalysisResult`.

use serde::Deserialize;
use thiserror::Error;
use uzcode_common::AnalysisResult;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    MalformedEnvelope(String),
    #[error("Missing candidates from API response. Check API key validity or safety settings.")]
    MissingCandidates,
    #[error("first candidate has no text part")]
    MissingText,
    #[error("model output is not a valid analysis: {0}")]
    InvalidPayload(String),
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Text of `candidates[0].content.parts[0]`, trimmed.
pub fn extract_text(body: &str) -> Result<String, DecodeError> {
    let envelope: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))?;

    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or(DecodeError::MissingCandidates)?;

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .ok_or(DecodeError::MissingText)
}

/// Decode a judge response. The whole analysis is produced or nothing is.
pub fn decode_analysis(body: &str) -> Result<AnalysisResult, DecodeError> {
    let text = extract_text(body)?;
    serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| DecodeError::InvalidPayload(e.to_string()))
}

// Models occasionally wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
