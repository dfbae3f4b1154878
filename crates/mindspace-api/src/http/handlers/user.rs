//! User profile handlers.
//!
//! Endpoints:
//! - GET   /api/v1/users/me            - The caller's profile
//! - PATCH /api/v1/users/me            - Partial profile update
//! - GET   /api/v1/users/psychologists - List psychologists

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use mindspace_types::user::{ProfileUpdate, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/me - The caller's own profile.
pub async fn me(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let request_id = Uuid::now_v7().to_string();
    let resp = ApiResponse::success(UserProfile::from(&user), request_id, 0)
        .with_link("self", "/api/v1/users/me");
    Ok(Json(resp))
}

/// PATCH /api/v1/users/me - Update the caller's profile.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let updated = state.auth_service.update_profile(user.id, &update).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(UserProfile::from(&updated), request_id, elapsed)
        .with_link("self", "/api/v1/users/me");
    Ok(Json(resp))
}

/// GET /api/v1/users/psychologists - List all psychologists.
pub async fn list_psychologists(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let psychologists = state.auth_service.list_psychologists().await?;
    let profiles: Vec<UserProfile> = psychologists.iter().map(UserProfile::from).collect();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(profiles, request_id, elapsed)
        .with_link("self", "/api/v1/users/psychologists");
    Ok(Json(resp))
}
