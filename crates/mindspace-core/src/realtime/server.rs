//! Connection authentication and message routing.
//!
//! [`ChatServer`] is the policy half of the realtime subsystem: the
//! transport layer (mindspace-api) hands it a token at connect time, a
//! handle per authenticated connection, and each inbound `send_message`
//! event. Everything else -- presence bookkeeping, membership checks,
//! persistence ordering, delivery, acknowledgment -- happens here.
//!
//! Authorization failures on the send path are silent drops by design:
//! answering "no such conversation" or "not a participant" would confirm
//! resource existence to an unauthorized caller.

use mindspace_types::error::AuthError;
use mindspace_types::event::{AckStatus, ServerEvent};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::realtime::presence::{ConnectionHandle, PresenceRegistry};
use crate::repository::{ChatRepository, UserRepository};

/// Realtime chat server: presence, handshake authentication, and the
/// validate-persist-deliver-acknowledge pipeline for inbound messages.
pub struct ChatServer<C, U, V> {
    presence: PresenceRegistry,
    chat_repo: C,
    user_repo: U,
    verifier: V,
}

impl<C, U, V> ChatServer<C, U, V>
where
    C: ChatRepository,
    U: UserRepository,
    V: TokenVerifier,
{
    pub fn new(chat_repo: C, user_repo: U, verifier: V) -> Self {
        Self {
            presence: PresenceRegistry::new(),
            chat_repo,
            user_repo,
            verifier,
        }
    }

    /// The presence registry (read-mostly; used for stats and tests).
    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    /// Resolve a handshake token to a user id.
    ///
    /// Any verifier failure and a subject without a matching user row are
    /// both plain rejections; the caller closes the connection without
    /// creating any state.
    pub async fn authenticate(&self, token: &str) -> Result<i64, AuthError> {
        let email = self.verifier.verify(token)?;
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownSubject)?;
        Ok(user.id)
    }

    /// Bind an authenticated user to their connection handle.
    pub fn register(&self, user_id: i64, handle: ConnectionHandle) {
        info!(user_id, handle_id = %handle.id(), "User connected");
        self.presence.register(user_id, handle);
    }

    /// Tear down a connection's presence entry, from any state.
    ///
    /// Safe to call for connections that never authenticated or were
    /// superseded by a newer login; those are no-ops.
    pub fn disconnect(&self, handle_id: Uuid) {
        self.presence.unregister(handle_id);
        debug!(handle_id = %handle_id, "Connection closed");
    }

    /// Process one inbound `send_message` event end-to-end.
    ///
    /// Persistence happens strictly before any delivery or acknowledgment;
    /// a client is never told "sent" for a message that could still be
    /// lost. A storage failure is logged and produces no acknowledgment,
    /// but never tears down the connection.
    pub async fn handle_send(&self, handle_id: Uuid, conversation_id: i64, text: String) {
        // 1. Unauthenticated handles have nowhere to address a response to.
        // The handle is captured here so the final acknowledgment goes to
        // the connection the message arrived on, even if the user logs in
        // again elsewhere while persistence is in flight.
        let Some((sender_id, sender_handle)) = self.presence.find_connection(handle_id) else {
            debug!(handle_id = %handle_id, "send_message from unregistered handle, dropping");
            return;
        };

        // 2-3. Unknown conversation and non-membership drop silently.
        let conversation = match self.chat_repo.get_conversation(conversation_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                debug!(conversation_id, sender_id, "send_message to unknown conversation");
                return;
            }
            Err(e) => {
                error!(conversation_id, sender_id, error = %e, "conversation lookup failed");
                return;
            }
        };

        let Some(recipient_id) = conversation.counterpart_of(sender_id) else {
            debug!(
                conversation_id,
                sender_id, "send_message from non-participant, dropping"
            );
            return;
        };

        // 4. Persist before anything becomes visible.
        let message = match self
            .chat_repo
            .append_message(conversation_id, sender_id, &text)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!(conversation_id, sender_id, error = %e, "message persist failed");
                return;
            }
        };

        // 5-6. Deliver to the counterpart only if they are online right now.
        if let Some(recipient) = self.presence.lookup(recipient_id) {
            let delivered = recipient.send(ServerEvent::NewMessage {
                conversation_id,
                sender_id,
                text: message.text.clone(),
                message_id: message.id,
                created_at: message.created_at,
            });
            if !delivered {
                debug!(recipient_id, "recipient connection closing, delivery skipped");
            }
        } else {
            debug!(recipient_id, "recipient offline, no live delivery");
        }

        // 7. Acknowledge on the sending connection regardless of recipient
        // reachability.
        let acked = sender_handle.send(ServerEvent::MessageSent {
            status: AckStatus::Ok,
            message_id: message.id,
        });
        if !acked {
            debug!(sender_id, "sender connection closing, ack skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    use std::sync::Arc;

    use chrono::Utc;
    use mindspace_types::chat::{Conversation, Message};
    use mindspace_types::error::RepositoryError;
    use mindspace_types::user::{NewUser, Profile, ProfileUpdate, User, UserRole};
    use tokio::sync::{Notify, mpsc};

    // --- Mocks -----------------------------------------------------------

    /// Pauses `append_message` so a test can interleave other work while
    /// the router is "inside" the storage call.
    #[derive(Default)]
    struct AppendGate {
        entered: Notify,
        release: Notify,
    }

    #[derive(Default)]
    struct MemoryChatRepo {
        conversations: Mutex<HashMap<i64, Conversation>>,
        messages: Mutex<Vec<Message>>,
        next_message_id: AtomicI64,
        fail_append: AtomicBool,
        append_gate: Mutex<Option<Arc<AppendGate>>>,
    }

    impl MemoryChatRepo {
        fn with_conversation(id: i64, student_id: i64, psychologist_id: i64) -> Self {
            let repo = Self {
                next_message_id: AtomicI64::new(1),
                ..Self::default()
            };
            repo.conversations.lock().unwrap().insert(
                id,
                Conversation {
                    id,
                    student_id,
                    psychologist_id,
                    created_at: Utc::now(),
                },
            );
            repo
        }

        fn stored_messages(&self) -> Vec<Message> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl ChatRepository for MemoryChatRepo {
        async fn create_conversation(
            &self,
            student_id: i64,
            psychologist_id: i64,
        ) -> Result<Conversation, RepositoryError> {
            let mut conversations = self.conversations.lock().unwrap();
            let id = conversations.len() as i64 + 1;
            let conversation = Conversation {
                id,
                student_id,
                psychologist_id,
                created_at: Utc::now(),
            };
            conversations.insert(id, conversation.clone());
            Ok(conversation)
        }

        async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, RepositoryError> {
            Ok(self.conversations.lock().unwrap().get(&id).cloned())
        }

        async fn list_conversations(
            &self,
            user_id: i64,
        ) -> Result<Vec<Conversation>, RepositoryError> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.has_participant(user_id))
                .cloned()
                .collect())
        }

        async fn list_messages(
            &self,
            conversation_id: i64,
        ) -> Result<Vec<Message>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id == conversation_id)
                .cloned()
                .collect())
        }

        async fn append_message(
            &self,
            conversation_id: i64,
            sender_id: i64,
            text: &str,
        ) -> Result<Message, RepositoryError> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let gate = self.append_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            let message = Message {
                id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
                conversation_id,
                sender_id,
                text: text.to_string(),
                created_at: Utc::now(),
            };
            self.messages.lock().unwrap().push(message.clone());
            Ok(message)
        }
    }

    struct MemoryUserRepo {
        users: Vec<User>,
    }

    fn user(id: i64, email: &str) -> User {
        User {
            id,
            email: email.to_string(),
            username: format!("user{id}"),
            password_hash: String::new(),
            role: UserRole::Student,
            is_active: true,
            created_at: Utc::now(),
            profile: Profile::default(),
        }
    }

    impl UserRepository for MemoryUserRepo {
        async fn create(&self, _user: &NewUser) -> Result<User, RepositoryError> {
            Err(RepositoryError::Query("not supported in mock".to_string()))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.iter().find(|u| u.id == id).cloned())
        }

        async fn list_psychologists(&self) -> Result<Vec<User>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn update_profile(
            &self,
            _user_id: i64,
            _update: &ProfileUpdate,
        ) -> Result<User, RepositoryError> {
            Err(RepositoryError::Query("not supported in mock".to_string()))
        }
    }

    /// Token verifier backed by a fixed token -> subject table.
    struct StaticVerifier {
        subjects: HashMap<String, String>,
    }

    impl StaticVerifier {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                subjects: pairs
                    .iter()
                    .map(|(t, s)| (t.to_string(), s.to_string()))
                    .collect(),
            }
        }
    }

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, token: &str) -> Result<String, AuthError> {
            self.subjects
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    type TestServer = ChatServer<MemoryChatRepo, MemoryUserRepo, StaticVerifier>;

    /// Users 1 and 2 share conversation 10; user 3 exists but is outside it.
    fn server() -> TestServer {
        ChatServer::new(
            MemoryChatRepo::with_conversation(10, 1, 2),
            MemoryUserRepo {
                users: vec![
                    user(1, "student@example.com"),
                    user(2, "psy@example.com"),
                    user(3, "other@example.com"),
                ],
            },
            StaticVerifier::new(&[
                ("token-1", "student@example.com"),
                ("token-2", "psy@example.com"),
                ("token-3", "other@example.com"),
                ("token-ghost", "ghost@example.com"),
            ]),
        )
    }

    fn connect(server: &TestServer, user_id: i64) -> (Uuid, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::now_v7();
        server.register(user_id, ConnectionHandle::new(id, tx));
        (id, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // --- Handshake -------------------------------------------------------

    #[tokio::test]
    async fn test_authenticate_resolves_known_subject() {
        let server = server();
        assert_eq!(server.authenticate("token-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_invalid_token_and_unknown_subject() {
        let server = server();

        assert!(matches!(
            server.authenticate("garbage").await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            server.authenticate("token-ghost").await,
            Err(AuthError::UnknownSubject)
        ));
        // No presence residue from rejected handshakes.
        assert_eq!(server.presence().online_count(), 0);
    }

    #[tokio::test]
    async fn test_handshake_binds_identity_to_handle() {
        let server = server();
        let user_id = server.authenticate("token-1").await.unwrap();
        let (handle_id, _rx) = connect(&server, user_id);

        assert_eq!(
            server.presence().lookup(1).map(|h| h.id()),
            Some(handle_id)
        );
        assert_eq!(server.presence().find_identity(handle_id), Some(1));
    }

    // --- Routing ---------------------------------------------------------

    #[tokio::test]
    async fn test_send_delivers_and_acknowledges_when_both_online() {
        let server = server();
        let (a_handle, mut a_rx) = connect(&server, 1);
        let (_b_handle, mut b_rx) = connect(&server, 2);

        server.handle_send(a_handle, 10, "hi".to_string()).await;

        let stored = server.chat_repo.stored_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sender_id, 1);
        assert_eq!(stored[0].conversation_id, 10);
        assert_eq!(stored[0].text, "hi");

        let delivered = drain(&mut b_rx);
        assert_eq!(delivered.len(), 1);
        match &delivered[0] {
            ServerEvent::NewMessage {
                conversation_id,
                sender_id,
                text,
                message_id,
                ..
            } => {
                assert_eq!(*conversation_id, 10);
                assert_eq!(*sender_id, 1);
                assert_eq!(text, "hi");
                assert_eq!(*message_id, stored[0].id);
            }
            other => panic!("expected NewMessage, got {other:?}"),
        }

        let acks = drain(&mut a_rx);
        assert_eq!(
            acks,
            vec![ServerEvent::MessageSent {
                status: AckStatus::Ok,
                message_id: stored[0].id,
            }]
        );
    }

    #[tokio::test]
    async fn test_send_acknowledges_even_when_recipient_offline() {
        let server = server();
        let (a_handle, mut a_rx) = connect(&server, 1);

        server.handle_send(a_handle, 10, "hello?".to_string()).await;

        assert_eq!(server.chat_repo.stored_messages().len(), 1);
        let acks = drain(&mut a_rx);
        assert!(matches!(
            acks.as_slice(),
            [ServerEvent::MessageSent { status: AckStatus::Ok, .. }]
        ));
    }

    #[tokio::test]
    async fn test_non_participant_send_is_fully_silent() {
        let server = server();
        let (_a, mut a_rx) = connect(&server, 1);
        let (intruder_handle, mut intruder_rx) = connect(&server, 3);

        server
            .handle_send(intruder_handle, 10, "let me in".to_string())
            .await;

        assert!(server.chat_repo.stored_messages().is_empty());
        assert!(drain(&mut a_rx).is_empty());
        assert!(drain(&mut intruder_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_silent() {
        let server = server();
        let (a_handle, mut a_rx) = connect(&server, 1);

        server.handle_send(a_handle, 999, "hi".to_string()).await;

        assert!(server.chat_repo.stored_messages().is_empty());
        assert!(drain(&mut a_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_handle_is_silent() {
        let server = server();
        let (_a, mut a_rx) = connect(&server, 1);

        server.handle_send(Uuid::now_v7(), 10, "hi".to_string()).await;

        assert!(server.chat_repo.stored_messages().is_empty());
        assert!(drain(&mut a_rx).is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_sends_no_acknowledgment() {
        let server = server();
        server.chat_repo.fail_append.store(true, Ordering::SeqCst);
        let (a_handle, mut a_rx) = connect(&server, 1);
        let (_b, mut b_rx) = connect(&server, 2);

        server.handle_send(a_handle, 10, "hi".to_string()).await;

        assert!(server.chat_repo.stored_messages().is_empty());
        assert!(drain(&mut a_rx).is_empty());
        assert!(drain(&mut b_rx).is_empty());
    }

    #[tokio::test]
    async fn test_ack_stays_on_sending_connection_across_relogin() {
        let server = Arc::new(server());
        let gate = Arc::new(AppendGate::default());
        *server.chat_repo.append_gate.lock().unwrap() = Some(Arc::clone(&gate));

        let (sending_handle, mut sending_rx) = connect(&server, 1);

        let task = tokio::spawn({
            let server = Arc::clone(&server);
            async move { server.handle_send(sending_handle, 10, "hi".to_string()).await }
        });

        // Wait until the router is inside the storage call, then let the
        // same user log in on a fresh connection before persist completes.
        gate.entered.notified().await;
        let (_new_handle, mut new_rx) = connect(&server, 1);
        gate.release.notify_one();
        task.await.unwrap();

        // The ack answers the connection that sent the message; the new
        // login sees nothing.
        let acks = drain(&mut sending_rx);
        assert!(matches!(
            acks.as_slice(),
            [ServerEvent::MessageSent { status: AckStatus::Ok, .. }]
        ));
        assert!(drain(&mut new_rx).is_empty());
    }

    #[tokio::test]
    async fn test_delivery_follows_reconnected_handle() {
        let server = server();
        let (a_handle, _a_rx) = connect(&server, 1);

        // B connects, then reconnects; the first connection's disconnect
        // arrives late.
        let (b_old, _b_old_rx) = connect(&server, 2);
        let (_b_new, mut b_new_rx) = connect(&server, 2);
        server.disconnect(b_old);

        server.handle_send(a_handle, 10, "hi".to_string()).await;

        assert_eq!(drain(&mut b_new_rx).len(), 1);
    }
}
