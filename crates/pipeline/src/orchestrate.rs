//! Conversation state transitions driven by classification results.
//!
//! All functions here are pure over the conversation value: the caller owns
//! persistence. Applying the same assessment twice is a no-op, so a retried
//! webhook or a replayed poll cannot corrupt state.

use chrono::{DateTime, Utc};
use leadline_core::message::{Conversation, ConversationId, ConversationStatus, Message, Role};
use leadline_core::review::{PendingReply, ReviewStatus};
use leadline_core::schema::{IntentReport, Outcome, OutcomeAssessment};
use tracing::{debug, info};

use crate::respond::Draft;

/// Exchange limits for a conversation thread.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum inbound/outbound exchange pairs before the thread is closed
    pub max_message_exchanges: usize,
}

impl Limits {
    /// Total message count at which the limit kicks in (one inbound plus one
    /// outbound per exchange).
    pub fn message_ceiling(&self) -> usize {
        self.max_message_exchanges * 2
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_exchanges: 10,
        }
    }
}

/// What [`apply`] did to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Thread closed with the given outcome
    Completed(Outcome),
    /// Draft appended, thread stays active
    Continued,
    /// Thread was already terminal; nothing changed
    AlreadyTerminal,
}

/// Fold an assessment and an optional drafted reply into the conversation.
///
/// Ordering: the terminal check runs before the draft is appended, so a
/// closing draft lands on a thread that is already marked complete. The
/// exchange limit overrides the model's verdict: once the ceiling is hit the
/// outcome is always `ReachedMessageLimit`, even if the assessment said
/// `continue`.
pub fn apply(
    conversation: &mut Conversation,
    assessment: &OutcomeAssessment,
    draft: Option<&Draft>,
    limits: Limits,
) -> Applied {
    if conversation.is_terminal() {
        debug!(conversation = %conversation.id, "Thread already terminal, skipping");
        return Applied::AlreadyTerminal;
    }

    let limit_hit = conversation.message_count() >= limits.message_ceiling();
    let closing = assessment.should_end || assessment.outcome.is_terminal() || limit_hit;

    if closing {
        let outcome = if limit_hit && !assessment.outcome.is_terminal() {
            Outcome::ReachedMessageLimit
        } else {
            assessment.outcome
        };
        conversation.status = ConversationStatus::Complete;
        // Write-once: an earlier outcome is never overwritten
        if conversation.outcome.is_none() {
            conversation.outcome = Some(outcome);
        }
        if let Some(draft) = draft {
            push_unless_duplicate(conversation, &draft.text);
        }
        info!(
            conversation = %conversation.id,
            outcome = ?conversation.outcome,
            limit_hit,
            "Conversation completed"
        );
        Applied::Completed(conversation.outcome.unwrap_or(outcome))
    } else {
        if let Some(draft) = draft {
            push_unless_duplicate(conversation, &draft.text);
        }
        Applied::Continued
    }
}

/// Record a detected intent. First detection wins; later reports only fill
/// the slot if it is still empty.
pub fn apply_intent(conversation: &mut Conversation, report: &IntentReport) {
    if conversation.intent.is_none() {
        conversation.intent = report.primary_intent;
        if let Some(intent) = conversation.intent {
            info!(conversation = %conversation.id, ?intent, "Intent recorded");
        }
    }
}

/// Find active conversations gone quiet past the threshold and mark them
/// cold. A thread only goes cold when the last message is one we sent: if
/// the prospect spoke last, the ball is in our court and the thread is not
/// stale, just unanswered.
///
/// Returns the ids of the conversations that were marked. Disabled sweeps
/// return empty without touching anything.
pub fn sweep_cold(
    conversations: &mut [Conversation],
    threshold_days: i64,
    enabled: bool,
    now: DateTime<Utc>,
) -> Vec<ConversationId> {
    if !enabled {
        return Vec::new();
    }

    let cutoff = now - chrono::Duration::days(threshold_days);
    let mut marked = Vec::new();
    for conv in conversations.iter_mut() {
        if conv.status != ConversationStatus::Active {
            continue;
        }
        if conv.last_message_at > cutoff {
            continue;
        }
        let sent_last = conv
            .last_message()
            .is_some_and(|m| m.role == Role::Sent);
        if !sent_last {
            continue;
        }
        conv.status = ConversationStatus::Cold;
        info!(
            conversation = %conv.id,
            idle_days = (now - conv.last_message_at).num_days(),
            "Conversation marked cold"
        );
        marked.push(conv.id.clone());
    }
    marked
}

/// Fold a reviewed draft back into the conversation. An approved or edited
/// reply replaces the trailing `Generated` message with a `Sent` one carrying
/// the final content; a rejection removes the draft. Unactioned replies are
/// left alone.
pub fn record_review(conversation: &mut Conversation, reply: &PendingReply) {
    if !reply.is_actioned() {
        return;
    }

    let trailing_draft = conversation
        .last_message()
        .is_some_and(|m| m.role == Role::Generated && m.content == reply.draft);
    if trailing_draft {
        conversation.messages.pop();
    }

    match reply.status {
        ReviewStatus::Approved | ReviewStatus::Edited => {
            conversation.push(Message::sent(reply.final_content()));
            info!(
                conversation = %conversation.id,
                status = ?reply.status,
                "Reviewed reply sent"
            );
        }
        ReviewStatus::Rejected | ReviewStatus::Pending => {
            info!(conversation = %conversation.id, "Draft rejected and removed");
        }
    }
}

fn push_unless_duplicate(conversation: &mut Conversation, text: &str) {
    let duplicate = conversation
        .last_message()
        .is_some_and(|m| m.role == Role::Generated && m.content == text);
    if !duplicate {
        conversation.push(Message::generated(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::message::Prospect;

    fn continuing() -> OutcomeAssessment {
        OutcomeAssessment::continuing()
    }

    fn terminal(outcome: Outcome) -> OutcomeAssessment {
        OutcomeAssessment {
            should_end: true,
            outcome,
            reasoning: None,
        }
    }

    fn draft(text: &str) -> Draft {
        Draft {
            text: text.to_string(),
            provider: "test".into(),
        }
    }

    fn conversation_with(messages: usize) -> Conversation {
        let mut conv = Conversation::new(Prospect::new("p@x.com", "Pat"), "Inquiry");
        for i in 0..messages {
            if i % 2 == 0 {
                conv.push(Message::prospect(format!("inbound {i}")));
            } else {
                conv.push(Message::sent(format!("outbound {i}")));
            }
        }
        conv
    }

    #[test]
    fn continue_appends_draft_and_stays_active() {
        let mut conv = conversation_with(2);
        let applied = apply(
            &mut conv,
            &continuing(),
            Some(&draft("Want a free class?")),
            Limits::default(),
        );
        assert_eq!(applied, Applied::Continued);
        assert_eq!(conv.status, ConversationStatus::Active);
        assert_eq!(conv.message_count(), 3);
        assert_eq!(conv.last_message().unwrap().role, Role::Generated);
        assert!(conv.outcome.is_none());
    }

    #[test]
    fn terminal_outcome_completes_thread() {
        let mut conv = conversation_with(4);
        let applied = apply(
            &mut conv,
            &terminal(Outcome::AgreedToFreeClass),
            Some(&draft("See you Tuesday!")),
            Limits::default(),
        );
        assert_eq!(applied, Applied::Completed(Outcome::AgreedToFreeClass));
        assert_eq!(conv.status, ConversationStatus::Complete);
        assert_eq!(conv.outcome, Some(Outcome::AgreedToFreeClass));
        assert_eq!(conv.last_message().unwrap().content, "See you Tuesday!");
    }

    #[test]
    fn limit_forces_reached_message_limit() {
        // 10 exchanges * 2 = ceiling of 20; start at the ceiling
        let mut conv = conversation_with(20);
        let applied = apply(&mut conv, &continuing(), None, Limits::default());
        assert_eq!(applied, Applied::Completed(Outcome::ReachedMessageLimit));
        assert_eq!(conv.outcome, Some(Outcome::ReachedMessageLimit));
    }

    #[test]
    fn limit_does_not_mask_terminal_verdict() {
        let mut conv = conversation_with(20);
        let applied = apply(
            &mut conv,
            &terminal(Outcome::AgreedToFreeClass),
            None,
            Limits::default(),
        );
        assert_eq!(applied, Applied::Completed(Outcome::AgreedToFreeClass));
    }

    #[test]
    fn apply_is_idempotent() {
        let mut conv = conversation_with(4);
        let assessment = terminal(Outcome::NotInterested);
        let d = draft("Thanks anyway!");
        apply(&mut conv, &assessment, Some(&d), Limits::default());
        let count = conv.message_count();
        let status = conv.status;

        let second = apply(&mut conv, &assessment, Some(&d), Limits::default());
        assert_eq!(second, Applied::AlreadyTerminal);
        assert_eq!(conv.message_count(), count);
        assert_eq!(conv.status, status);
        assert_eq!(conv.outcome, Some(Outcome::NotInterested));
    }

    #[test]
    fn duplicate_draft_is_not_appended_twice() {
        let mut conv = conversation_with(2);
        let d = draft("Same text");
        apply(&mut conv, &continuing(), Some(&d), Limits::default());
        apply(&mut conv, &continuing(), Some(&d), Limits::default());
        assert_eq!(conv.message_count(), 3);
    }

    #[test]
    fn outcome_is_write_once() {
        let mut conv = conversation_with(2);
        conv.outcome = Some(Outcome::AgreedToFreeClass);
        apply(
            &mut conv,
            &terminal(Outcome::NotInterested),
            None,
            Limits::default(),
        );
        assert_eq!(conv.outcome, Some(Outcome::AgreedToFreeClass));
    }

    #[test]
    fn intent_first_detection_wins() {
        use leadline_core::schema::Intent;
        let mut conv = conversation_with(2);
        let first = IntentReport {
            primary_intent: Some(Intent::WeightLoss),
            confidence: Some(0.9),
            reasoning: None,
            best_time_to_visit: None,
        };
        let second = IntentReport {
            primary_intent: Some(Intent::GeneralFitness),
            confidence: Some(0.5),
            reasoning: None,
            best_time_to_visit: None,
        };
        apply_intent(&mut conv, &first);
        apply_intent(&mut conv, &second);
        assert_eq!(conv.intent, Some(Intent::WeightLoss));
    }

    mod review {
        use super::*;

        fn conversation_with_draft(text: &str) -> Conversation {
            let mut conv = conversation_with(2);
            conv.push(Message::generated(text));
            conv
        }

        #[test]
        fn approved_draft_becomes_sent() {
            let mut conv = conversation_with_draft("Want a free class?");
            let mut reply = PendingReply::new(conv.id.clone(), "Want a free class?", "grok");
            reply.approve(None);

            record_review(&mut conv, &reply);
            let last = conv.last_message().unwrap();
            assert_eq!(last.role, Role::Sent);
            assert_eq!(last.content, "Want a free class?");
            assert_eq!(conv.message_count(), 3);
        }

        #[test]
        fn edited_draft_sends_edited_text() {
            let mut conv = conversation_with_draft("Original draft");
            let mut reply = PendingReply::new(conv.id.clone(), "Original draft", "grok");
            reply.approve(Some("Edited version".into()));

            record_review(&mut conv, &reply);
            assert_eq!(conv.last_message().unwrap().content, "Edited version");
        }

        #[test]
        fn rejected_draft_is_removed() {
            let mut conv = conversation_with_draft("Bad draft");
            let mut reply = PendingReply::new(conv.id.clone(), "Bad draft", "grok");
            reply.reject();

            record_review(&mut conv, &reply);
            assert_eq!(conv.message_count(), 2);
            assert_ne!(conv.last_message().unwrap().role, Role::Generated);
        }

        #[test]
        fn unactioned_reply_changes_nothing() {
            let mut conv = conversation_with_draft("Still pending");
            let reply = PendingReply::new(conv.id.clone(), "Still pending", "grok");

            record_review(&mut conv, &reply);
            assert_eq!(conv.message_count(), 3);
            assert_eq!(conv.last_message().unwrap().role, Role::Generated);
        }
    }

    mod sweep {
        use super::*;

        fn stale_conversation(days_idle: i64, last_role: Role) -> Conversation {
            let mut conv = conversation_with(1);
            let msg = match last_role {
                Role::Sent => Message::sent("any news?"),
                Role::Prospect => Message::prospect("still thinking"),
                Role::Generated => Message::generated("draft"),
            };
            conv.push(msg);
            conv.last_message_at = Utc::now() - chrono::Duration::days(days_idle);
            conv
        }

        #[test]
        fn stale_sent_thread_goes_cold() {
            let mut convs = vec![stale_conversation(10, Role::Sent)];
            let marked = sweep_cold(&mut convs, 7, true, Utc::now());
            assert_eq!(marked.len(), 1);
            assert_eq!(convs[0].status, ConversationStatus::Cold);
        }

        #[test]
        fn prospect_spoke_last_is_not_cold() {
            let mut convs = vec![stale_conversation(10, Role::Prospect)];
            let marked = sweep_cold(&mut convs, 7, true, Utc::now());
            assert!(marked.is_empty());
            assert_eq!(convs[0].status, ConversationStatus::Active);
        }

        #[test]
        fn recent_thread_is_not_cold() {
            let mut convs = vec![stale_conversation(3, Role::Sent)];
            let marked = sweep_cold(&mut convs, 7, true, Utc::now());
            assert!(marked.is_empty());
        }

        #[test]
        fn disabled_sweep_touches_nothing() {
            let mut convs = vec![stale_conversation(30, Role::Sent)];
            let marked = sweep_cold(&mut convs, 7, false, Utc::now());
            assert!(marked.is_empty());
            assert_eq!(convs[0].status, ConversationStatus::Active);
        }

        #[test]
        fn completed_thread_is_skipped() {
            let mut convs = vec![stale_conversation(30, Role::Sent)];
            convs[0].status = ConversationStatus::Complete;
            let marked = sweep_cold(&mut convs, 7, true, Utc::now());
            assert!(marked.is_empty());
        }
    }
}
