//! Bearer token authentication extractor.
//!
//! Extracts the access token from the `Authorization: Bearer <token>`
//! header (or the legacy `Token: <token>` header), verifies it, and
//! resolves it to the user it identifies. Handlers take [`CurrentUser`]
//! as an argument to require authentication.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mindspace_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token
/// and loads the user row.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.auth_service.authenticate_token(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// Extract the access token from request headers.
fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(token) = parts.headers.get("token") {
        let token_str = token
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Token header encoding".to_string()))?;
        return Ok(token_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing access token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
    ))
}
