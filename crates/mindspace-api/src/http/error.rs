//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use mindspace_types::error::{AuthError, BookingError, ChatError, MaterialError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication and account errors.
    Auth(AuthError),
    /// Conversation and message errors.
    Chat(ChatError),
    /// Booking errors.
    Booking(BookingError),
    /// Materials library errors.
    Material(MaterialError),
    /// Authentication failure at the transport level (missing header).
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        AppError::Booking(e)
    }
}

impl From<MaterialError> for AppError {
    fn from(e: MaterialError) -> Self {
        AppError::Material(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(AuthError::InvalidToken) | AppError::Auth(AuthError::UnknownSubject) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or expired token".to_string())
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", "Invalid email or password".to_string())
            }
            AppError::Auth(e @ AuthError::EmailTaken(_)) => {
                (StatusCode::CONFLICT, "EMAIL_TAKEN", e.to_string())
            }
            AppError::Auth(e @ AuthError::UsernameTaken(_)) => {
                (StatusCode::CONFLICT, "USERNAME_TAKEN", e.to_string())
            }
            AppError::Auth(AuthError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::ConversationNotFound) => {
                (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND", "Conversation not found".to_string())
            }
            AppError::Chat(ChatError::NotParticipant) => {
                (StatusCode::FORBIDDEN, "NOT_PARTICIPANT", "Not a participant of this conversation".to_string())
            }
            AppError::Chat(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_ERROR", e.to_string())
            }
            AppError::Booking(BookingError::NotFound) => {
                (StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND", "Booking not found".to_string())
            }
            AppError::Booking(BookingError::PsychologistNotFound) => {
                (StatusCode::NOT_FOUND, "PSYCHOLOGIST_NOT_FOUND", "Psychologist not found".to_string())
            }
            AppError::Booking(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "BOOKING_ERROR", e.to_string())
            }
            AppError::Material(MaterialError::NotFound) => {
                (StatusCode::NOT_FOUND, "MATERIAL_NOT_FOUND", "Material not found".to_string())
            }
            AppError::Material(e @ MaterialError::CategoryConflict(_)) => {
                (StatusCode::CONFLICT, "CATEGORY_CONFLICT", e.to_string())
            }
            AppError::Material(MaterialError::Forbidden) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Only psychologists may publish materials".to_string())
            }
            AppError::Material(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MATERIAL_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        // Error bodies carry a meta of their own: a fresh request id minted
        // here (errors can fire before a handler ever assigns one) and no
        // response_time_ms, since no handler timing exists on this path.
        let body = json!({
            "data": null,
            "meta": {
                "request_id": Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_maps_to_401() {
        let resp = AppError::Auth(AuthError::InvalidToken).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_participant_maps_to_403() {
        let resp = AppError::Chat(ChatError::NotParticipant).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_email_taken_maps_to_409() {
        let resp = AppError::Auth(AuthError::EmailTaken("a@b.c".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_error_body_carries_real_request_id_and_no_timing() {
        let resp = AppError::Validation("bad input".to_string()).into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let request_id = body["meta"]["request_id"].as_str().unwrap();
        assert!(Uuid::parse_str(request_id).is_ok());
        assert!(body["meta"].get("response_time_ms").is_none());
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());
    }
}
