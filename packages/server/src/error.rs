use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::catalog::CatalogError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `UNKNOWN_CALLER`, `NOT_FOUND`,
    /// `CONFLICT`, `USERNAME_TAKEN`, `JUDGE_UNAUTHORIZED`, `JUDGE_FAILED`,
    /// `UPSTREAM_UNAVAILABLE`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Problem 'two-sum' not found in cache.")]
    pub detail: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// Token is valid but the user it names no longer exists.
    UnknownCaller,
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    /// The judge rejected our credentials. Carries the judge critique.
    JudgeUnauthorized(String),
    /// The judge did not produce a usable verdict. Carries the judge critique.
    JudgeFailed(String),
    /// A third-party dependency could not be reached.
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    detail: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    detail: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    detail: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    detail: "Incorrect username or password".into(),
                },
            ),
            AppError::UnknownCaller => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "UNKNOWN_CALLER",
                    detail: "User is not registered. Please sign up first.".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    detail: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    detail: msg,
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    detail: "Username already registered".into(),
                },
            ),
            AppError::JudgeUnauthorized(critique) => {
                tracing::warn!("Judge rejected credentials: {}", critique);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody {
                        code: "JUDGE_UNAUTHORIZED",
                        detail: judge_detail(&critique),
                    },
                )
            }
            AppError::JudgeFailed(critique) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    code: "JUDGE_FAILED",
                    detail: judge_detail(&critique),
                },
            ),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "UPSTREAM_UNAVAILABLE",
                        detail: msg,
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        detail: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

fn judge_detail(critique: &str) -> String {
    format!("AI Judge failed to produce a valid analysis: {critique}")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Upstream(format!("Failed to fetch from problem catalog: {err}"))
    }
}
