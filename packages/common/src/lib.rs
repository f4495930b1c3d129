pub mod analysis;
pub mod retry;
pub mod submission_status;

pub use analysis::AnalysisResult;
pub use retry::RetryPolicy;
pub use submission_status::SubmissionStatus;
