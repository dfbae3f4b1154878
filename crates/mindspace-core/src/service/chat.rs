//! Conversation service for the HTTP surface.
//!
//! Covers conversation creation and history retrieval. Live delivery is the
//! realtime core's job (`crate::realtime`); both go through the same
//! `ChatRepository`, so the store's insertion order stays the single
//! ordering authority.

use mindspace_types::chat::{Conversation, Message};
use mindspace_types::error::ChatError;
use tracing::info;

use crate::repository::ChatRepository;

/// Orchestrates conversation CRUD with participant checks.
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
}

impl<C: ChatRepository> ChatService<C> {
    pub fn new(chat_repo: C) -> Self {
        Self { chat_repo }
    }

    /// Create a conversation. The caller must be one of the two
    /// participants; nobody can open a conversation on behalf of others.
    pub async fn create_conversation(
        &self,
        caller_id: i64,
        student_id: i64,
        psychologist_id: i64,
    ) -> Result<Conversation, ChatError> {
        if caller_id != student_id && caller_id != psychologist_id {
            return Err(ChatError::NotParticipant);
        }

        let conversation = self
            .chat_repo
            .create_conversation(student_id, psychologist_id)
            .await?;
        info!(
            conversation_id = conversation.id,
            student_id, psychologist_id, "Conversation created"
        );
        Ok(conversation)
    }

    /// List conversations the user participates in.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.chat_repo.list_conversations(user_id).await?)
    }

    /// Message history of a conversation, participants only.
    ///
    /// Unlike the WebSocket path, the HTTP surface distinguishes "not
    /// found" from "not yours": the caller already authenticated and the
    /// response codes match the original API.
    pub async fn messages(
        &self,
        caller_id: i64,
        conversation_id: i64,
    ) -> Result<Vec<Message>, ChatError> {
        let conversation = self
            .chat_repo
            .get_conversation(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        if !conversation.has_participant(caller_id) {
            return Err(ChatError::NotParticipant);
        }

        Ok(self.chat_repo.list_messages(conversation_id).await?)
    }
}
