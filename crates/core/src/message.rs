//! Prospect, Conversation, and Message domain types.
//!
//! These are the core value objects that flow through the system:
//! a prospect replies → the classifier assesses the thread → the orchestrator
//! updates the conversation and appends a generated draft for review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Intent, Outcome};

/// Unique identifier for a conversation (one prospect thread).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A potential customer being qualified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    pub email: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Prospect {
    pub fn new(email: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            phone: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Who produced a message in a conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The prospect wrote this (inbound reply)
    Prospect,
    /// LLM-drafted reply awaiting human approval
    Generated,
    /// Approved reply that went out to the prospect
    Sent,
}

/// Lifecycle of a conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Exchange in progress
    Active,
    /// Prospect went silent past the inactivity threshold
    Cold,
    /// Terminal outcome reached or exchange limit hit
    Complete,
}

/// A single message in a conversation. Immutable once created; ordered by
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// An inbound message from the prospect.
    pub fn prospect(content: impl Into<String>) -> Self {
        Self::new(Role::Prospect, content)
    }

    /// An LLM-drafted reply, not yet approved.
    pub fn generated(content: impl Into<String>) -> Self {
        Self::new(Role::Generated, content)
    }

    /// A reply that was approved and sent.
    pub fn sent(content: impl Into<String>) -> Self {
        Self::new(Role::Sent, content)
    }
}

/// A conversation thread with one prospect.
///
/// Invariants:
/// - `outcome` is write-once: it only transitions from `None` to a terminal
///   value, never between terminal values.
/// - `status` transitions active→cold (inactivity sweep) or
///   active/cold→complete (terminal outcome or exchange limit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub prospect: Prospect,
    /// Email subject used for threading inbound replies
    pub thread_subject: String,
    pub status: ConversationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(prospect: Prospect, thread_subject: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            prospect,
            thread_subject: thread_subject.into(),
            status: ConversationStatus::Active,
            outcome: None,
            intent: None,
            messages: Vec::new(),
            created_at: now,
            last_message_at: now,
        }
    }

    /// Append a message and bump the activity timestamp.
    pub fn push(&mut self, message: Message) {
        self.last_message_at = message.timestamp;
        self.messages.push(message);
    }

    /// Total messages in the thread. The exchange limit compares this
    /// against `max_message_exchanges * 2` (one inbound + one outbound per
    /// exchange).
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Whether the thread has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status == ConversationStatus::Complete
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Reopen a cold or completed thread when the prospect writes again.
    pub fn reopen(&mut self) {
        self.status = ConversationStatus::Active;
        self.outcome = None;
        self.last_message_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::new(Prospect::new("sam@example.com", "Sam"), "Free class inquiry")
    }

    #[test]
    fn create_prospect_message() {
        let msg = Message::prospect("Do you have evening classes?");
        assert_eq!(msg.role, Role::Prospect);
        assert_eq!(msg.content, "Do you have evening classes?");
    }

    #[test]
    fn push_updates_activity_timestamp() {
        let mut conv = conversation();
        let before = conv.last_message_at;
        let msg = Message::prospect("Hi");
        let ts = msg.timestamp;
        conv.push(msg);
        assert_eq!(conv.message_count(), 1);
        assert!(conv.last_message_at >= before);
        assert_eq!(conv.last_message_at, ts);
    }

    #[test]
    fn new_conversation_is_active_with_no_outcome() {
        let conv = conversation();
        assert_eq!(conv.status, ConversationStatus::Active);
        assert!(conv.outcome.is_none());
        assert!(!conv.is_terminal());
    }

    #[test]
    fn reopen_clears_outcome() {
        let mut conv = conversation();
        conv.status = ConversationStatus::Cold;
        conv.outcome = Some(Outcome::NotInterested);
        conv.reopen();
        assert_eq!(conv.status, ConversationStatus::Active);
        assert!(conv.outcome.is_none());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::Generated).unwrap(),
            "\"generated\""
        );
        assert_eq!(serde_json::to_string(&Role::Sent).unwrap(), "\"sent\"");
    }

    #[test]
    fn conversation_serialization_roundtrip() {
        let mut conv = conversation();
        conv.push(Message::prospect("Hello"));
        let json = serde_json::to_string(&conv).unwrap();
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.messages.len(), 1);
        assert_eq!(back.prospect.first_name, "Sam");
    }
}
