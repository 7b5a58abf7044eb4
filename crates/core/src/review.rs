//! Draft review workflow — every generated reply passes through a human
//! before it is sent.
//!
//! A [`PendingReply`] starts `Pending` and moves to exactly one of
//! `Approved`, `Edited`, or `Rejected`. The content that actually goes out
//! is the edited text when present, otherwise the original draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ConversationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    Edited,
}

/// An LLM-drafted reply awaiting human approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReply {
    pub id: String,
    pub conversation_id: ConversationId,

    /// Original LLM-generated content
    pub draft: String,

    /// Content after human editing, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<String>,

    /// Which provider generated the draft
    pub provider: String,

    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actioned_at: Option<DateTime<Utc>>,
}

impl PendingReply {
    pub fn new(
        conversation_id: ConversationId,
        draft: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id,
            draft: draft.into(),
            edited: None,
            provider: provider.into(),
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
            actioned_at: None,
        }
    }

    /// Approve the draft, optionally replacing its text. A reply that was
    /// edited records `Edited` rather than `Approved`.
    pub fn approve(&mut self, edited_content: Option<String>) {
        match edited_content {
            Some(content) => {
                self.edited = Some(content);
                self.status = ReviewStatus::Edited;
            }
            None => self.status = ReviewStatus::Approved,
        }
        self.actioned_at = Some(Utc::now());
    }

    pub fn reject(&mut self) {
        self.status = ReviewStatus::Rejected;
        self.actioned_at = Some(Utc::now());
    }

    /// Whether this reply has been actioned either way.
    pub fn is_actioned(&self) -> bool {
        self.status != ReviewStatus::Pending
    }

    /// The content to send: edited text when available, otherwise the draft.
    pub fn final_content(&self) -> &str {
        self.edited.as_deref().unwrap_or(&self.draft)
    }
}
