//! Session booking HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/bookings      - Book a session
//! - GET    /api/v1/bookings      - List the caller's bookings
//! - GET    /api/v1/bookings/{id} - Get a booking
//! - PATCH  /api/v1/bookings/{id} - Update date/time/notes/status
//! - DELETE /api/v1/bookings/{id} - Cancel (status change, row stays)

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use mindspace_types::booking::{Booking, BookingUpdate, NewBooking};

use crate::http::error::AppError;
use crate::http::extractors::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/bookings - Book a session with a psychologist.
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(booking): Json<NewBooking>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let booking = state.booking_service.create(user.id, &booking).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(booking, request_id, elapsed)
        .with_link("self", "/api/v1/bookings");
    Ok(Json(resp))
}

/// GET /api/v1/bookings - List the caller's bookings.
pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Booking>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let bookings = state.booking_service.list_for_user(user.id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(bookings, request_id, elapsed)
        .with_link("self", "/api/v1/bookings");
    Ok(Json(resp))
}

/// GET /api/v1/bookings/{id} - Get one of the caller's bookings.
pub async fn get_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let booking = state
        .booking_service
        .get(user.id, id)
        .await?
        .ok_or(AppError::Booking(
            mindspace_types::error::BookingError::NotFound,
        ))?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(booking, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bookings/{id}"));
    Ok(Json(resp))
}

/// PATCH /api/v1/bookings/{id} - Partial update.
pub async fn update_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let booking = state.booking_service.update(user.id, id, &update).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(booking, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bookings/{id}"));
    Ok(Json(resp))
}

/// DELETE /api/v1/bookings/{id} - Cancel a booking.
pub async fn cancel_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state.booking_service.cancel(user.id, id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"cancelled": true, "booking_id": id}),
        request_id,
        elapsed,
    );
    Ok(Json(resp))
}
