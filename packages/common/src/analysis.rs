use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Sentinel status for a judge call that failed to produce usable output.
pub const STATUS_ERROR: &str = "Error";

/// Sentinel status for a judge call rejected by the remote service.
pub const STATUS_API_CALL_FAILED: &str = "API_CALL_FAILED";

/// Statuses reserved for judge-side failure. Never a genuine verdict.
pub const SENTINEL_STATUSES: &[&str] = &[STATUS_ERROR, STATUS_API_CALL_FAILED];

/// Placeholder complexity used in sentinel results.
pub const UNKNOWN_COMPLEXITY: &str = "Unknown";

/// Structured verdict produced by the AI judge.
///
/// The wire format uses camelCase keys because the same shape is sent to the
/// model as its response schema and stored verbatim in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Verdict, e.g. `Accepted`. `Error` and `API_CALL_FAILED` signal failure.
    #[schema(example = "Accepted")]
    pub status: String,
    /// Estimated time complexity.
    #[schema(example = "O(n)")]
    pub time_complexity: String,
    /// Estimated space complexity.
    #[schema(example = "O(1)")]
    pub space_complexity: String,
    /// Free-text review, written in Uzbek.
    #[schema(example = "Yechim to'g'ri va samarali.")]
    pub critique: String,
}

impl AnalysisResult {
    /// Build a failure result carrying one of the sentinel statuses.
    pub fn sentinel(status: &'static str, critique: impl Into<String>) -> Self {
        debug_assert!(SENTINEL_STATUSES.contains(&status));
        Self {
            status: status.to_string(),
            time_complexity: UNKNOWN_COMPLEXITY.to_string(),
            space_complexity: UNKNOWN_COMPLEXITY.to_string(),
            critique: critique.into(),
        }
    }

    /// Returns true if the status marks a judge-side failure.
    pub fn is_sentinel(&self) -> bool {
        SENTINEL_STATUSES.contains(&self.status.as_str())
    }

    /// Response schema handed to the model, in the generative API's
    /// OpenAPI-subset dialect.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "status": { "type": "STRING" },
                "timeComplexity": { "type": "STRING" },
                "spaceComplexity": { "type": "STRING" },
                "critique": { "type": "STRING" },
            },
            "required": ["status", "timeComplexity", "spaceComplexity", "critique"],
            "propertyOrdering": ["status", "timeComplexity", "spaceComplexity", "critique"],
        })
    }
}
