//! Account registration and login handlers.
//!
//! Endpoints:
//! - POST /api/v1/auth/register - Create an account
//! - POST /api/v1/auth/login    - Verify credentials, issue access token

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mindspace_types::user::{Registration, UserProfile};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserProfile,
}

/// POST /api/v1/auth/register - Create an account. 201 on success.
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user = state.auth_service.register(registration).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(UserProfile::from(&user), request_id, elapsed)
        .with_link("login", "/api/v1/auth/login");
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/login - Verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (access_token, user) = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        LoginResponse {
            access_token,
            token_type: "bearer",
            user: UserProfile::from(&user),
        },
        request_id,
        elapsed,
    )
    .with_link("me", "/api/v1/users/me");
    Ok(Json(resp))
}
