//! ChatRepository trait definition.
//!
//! The conversation store behind the realtime core. `append_message` is the
//! durability point for message delivery: once it returns `Ok`, the message
//! id and timestamp it carries are committed.

use mindspace_types::chat::{Conversation, Message};
use mindspace_types::error::RepositoryError;

/// Repository trait for conversation and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a two-party conversation.
    fn create_conversation(
        &self,
        student_id: i64,
        psychologist_id: i64,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations where the user is either participant, oldest first.
    fn list_conversations(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// List all messages of a conversation, ordered by creation.
    fn list_messages(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Append a message, returning it with its server-assigned id and
    /// timestamp. Durable upon return.
    fn append_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;
}
