//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/conversations               - Create a conversation
//! - GET  /api/v1/conversations               - List the caller's conversations
//! - GET  /api/v1/conversations/{id}/messages - Message history
//!
//! Live delivery happens over the WebSocket (see `ws.rs`); these endpoints
//! cover setup and history.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use mindspace_types::chat::{Conversation, Message};
use mindspace_types::user::UserRole;

use crate::http::error::AppError;
use crate::http::extractors::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Create-conversation request body. The caller names only the counterpart;
/// their own side is filled in from the authenticated identity.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub student_id: Option<i64>,
    pub psychologist_id: Option<i64>,
}

/// POST /api/v1/conversations - Create a two-party conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (student_id, psychologist_id) = match user.role {
        UserRole::Student => {
            let psychologist_id = request.psychologist_id.ok_or_else(|| {
                AppError::Validation("psychologist_id is required".to_string())
            })?;
            (user.id, psychologist_id)
        }
        UserRole::Psychologist => {
            let student_id = request
                .student_id
                .ok_or_else(|| AppError::Validation("student_id is required".to_string()))?;
            (student_id, user.id)
        }
    };

    let conversation = state
        .chat_service
        .create_conversation(user.id, student_id, psychologist_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(conversation, request_id, elapsed)
        .with_link("self", "/api/v1/conversations");
    Ok(Json(resp))
}

/// GET /api/v1/conversations - Conversations the caller participates in.
pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversations = state.chat_service.list_for_user(user.id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(conversations, request_id, elapsed)
        .with_link("self", "/api/v1/conversations");
    Ok(Json(resp))
}

/// GET /api/v1/conversations/{id}/messages - Message history.
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let messages = state.chat_service.messages(user.id, conversation_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(messages, request_id, elapsed).with_link(
        "self",
        &format!("/api/v1/conversations/{conversation_id}/messages"),
    );
    Ok(Json(resp))
}
