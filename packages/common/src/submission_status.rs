use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Verdict recorded when the judge returns a status that collides with a
/// lifecycle name or is blank.
pub const UNKNOWN_VERDICT: &str = "Unknown";

/// Status of a submission during the judging lifecycle.
///
/// Stored as its string form. `Pending` is the only non-terminal value; a
/// submission moves out of it exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    /// Created, judge call not finished yet.
    #[default]
    Pending,
    /// Verdict produced by the judge (free-form, e.g. `Accepted`).
    Judged(String),
    /// The judge failed to produce a usable verdict.
    Failed,
    /// The server failed after the submission was recorded.
    SystemError,
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "Pending";
    pub const FAILED: &'static str = "Failed";
    pub const SYSTEM_ERROR: &'static str = "System Error";

    /// Build a terminal status from a judge verdict.
    ///
    /// Lifecycle names are reserved and blank verdicts carry no information,
    /// so both become `Unknown`. A judged row therefore always reads back as
    /// `Judged`.
    pub fn verdict(status: &str) -> Self {
        let status = status.trim();
        if status.is_empty() || Self::is_lifecycle_name(status) {
            Self::Judged(UNKNOWN_VERDICT.to_string())
        } else {
            Self::Judged(status.to_string())
        }
    }

    fn is_lifecycle_name(status: &str) -> bool {
        [Self::PENDING, Self::FAILED, Self::SYSTEM_ERROR]
            .iter()
            .any(|name| name.eq_ignore_ascii_case(status))
    }

    /// Returns true once judging is complete, successfully or not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the stored string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING,
            Self::Judged(verdict) => verdict,
            Self::Failed => Self::FAILED,
            Self::SystemError => Self::SYSTEM_ERROR,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SubmissionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            Self::PENDING => Self::Pending,
            Self::FAILED => Self::Failed,
            Self::SYSTEM_ERROR => Self::SystemError,
            _ => Self::Judged(s),
        }
    }
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Judged(verdict) => verdict,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}
