use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use sea_orm::EntityTrait;
use serde::Deserialize;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// The token's user id is checked against the database, so a token that
/// outlives its account is rejected as `UnknownCaller`.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        let user = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .ok_or(AppError::UnknownCaller)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

#[derive(Deserialize)]
struct AdminTokenQuery {
    admin_token: Option<String>,
}

/// Caller presented the configured admin token, either in the
/// `X-Admin-Token` header or as the `admin_token` query parameter.
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let presented = match from_header {
            Some(token) => Some(token),
            None => Query::<AdminTokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.admin_token),
        };

        // Missing and wrong tokens are indistinguishable to the caller.
        match presented {
            Some(token) if token == state.config.admin.token => Ok(AdminAccess),
            _ => Err(AppError::TokenInvalid),
        }
    }
}
