//! Conversation and message types.
//!
//! A conversation is a fixed two-party context between one student and one
//! psychologist; participants never change after creation. Messages are
//! append-only: id and created_at are assigned by the store at persistence
//! time, and the insertion order there is the sole ordering authority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A two-party conversation between a student and a psychologist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub student_id: i64,
    pub psychologist_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Whether `user_id` is one of the two participants.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.student_id == user_id || self.psychologist_id == user_id
    }

    /// The participant on the other side of `user_id`.
    ///
    /// Returns `None` if `user_id` is not a participant at all.
    pub fn counterpart_of(&self, user_id: i64) -> Option<i64> {
        if user_id == self.student_id {
            Some(self.psychologist_id)
        } else if user_id == self.psychologist_id {
            Some(self.student_id)
        } else {
            None
        }
    }
}

/// A single persisted message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation {
            id: 10,
            student_id: 1,
            psychologist_id: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_participant() {
        let conv = conversation();
        assert!(conv.has_participant(1));
        assert!(conv.has_participant(2));
        assert!(!conv.has_participant(3));
    }

    #[test]
    fn test_counterpart_of() {
        let conv = conversation();
        assert_eq!(conv.counterpart_of(1), Some(2));
        assert_eq!(conv.counterpart_of(2), Some(1));
        assert_eq!(conv.counterpart_of(3), None);
    }
}
