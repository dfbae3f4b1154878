//! WebSocket wire events for the realtime chat channel.
//!
//! Clients send JSON text frames matching [`ClientEvent`]; the server pushes
//! [`ServerEvent`] frames. Both are tagged enums so the `type` field drives
//! dispatch on either side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoming event from a WebSocket client.
///
/// Unknown or malformed frames are logged and ignored by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Send a message into a conversation the sender belongs to.
    SendMessage { conversation_id: i64, text: String },
    /// Keep-alive ping. Server responds with [`ServerEvent::Pong`].
    Ping,
}

/// Outgoing event pushed to a WebSocket client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message arrived in one of the recipient's conversations.
    NewMessage {
        conversation_id: i64,
        sender_id: i64,
        text: String,
        message_id: i64,
        created_at: DateTime<Utc>,
    },
    /// Acknowledgment to the sender that their message was persisted.
    ///
    /// Emitted regardless of whether the counterpart was reachable.
    MessageSent { status: AckStatus, message_id: i64 },
    /// Reply to [`ClientEvent::Ping`].
    Pong,
}

/// Acknowledgment status. Only `Ok` exists today; a failed persist produces
/// no acknowledgment at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Ok,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_send_message_shape() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"send_message","conversation_id":10,"text":"hi"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage {
                conversation_id: 10,
                text: "hi".to_string(),
            }
        );
    }

    #[test]
    fn test_client_event_rejects_unknown_type() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"shutdown"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_message_sent_shape() {
        let event = ServerEvent::MessageSent {
            status: AckStatus::Ok,
            message_id: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message_sent");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["message_id"], 42);
    }

    #[test]
    fn test_server_event_new_message_shape() {
        let event = ServerEvent::NewMessage {
            conversation_id: 10,
            sender_id: 1,
            text: "hi".to_string(),
            message_id: 42,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "new_message");
        assert_eq!(json["conversation_id"], 10);
        assert_eq!(json["sender_id"], 1);
    }
}
