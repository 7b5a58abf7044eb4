//! Builds the chat context sent to providers from a conversation thread.

use leadline_core::message::Conversation;
use leadline_core::provider::ChatMessage;

/// Map a conversation to wire messages: system prompt first, then the
/// history with prospect messages as `user` and our drafts/sends as
/// `assistant`. `window` caps the history to the most recent N messages;
/// unbounded history is the caller's problem to truncate before it gets
/// here, but the cap keeps classification requests small regardless.
pub fn build_context(
    conversation: &Conversation,
    system_prompt: &str,
    window: Option<usize>,
) -> Vec<ChatMessage> {
    let history = match window {
        Some(n) if conversation.messages.len() > n => {
            &conversation.messages[conversation.messages.len() - n..]
        }
        _ => &conversation.messages[..],
    };

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().map(ChatMessage::from_domain));
    messages
}

/// Serialize recent history for embedding into an analysis prompt.
pub fn history_json(conversation: &Conversation, window: usize) -> String {
    let messages = build_context(conversation, "", Some(window));
    // Skip the empty system slot; the analysis prompt carries its own framing
    serde_json::to_string_pretty(&messages[1..]).unwrap_or_else(|_| "[]".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::message::{Message, Prospect};
    use leadline_core::provider::ChatRole;

    fn conversation_with(n: usize) -> Conversation {
        let mut conv = Conversation::new(Prospect::new("a@b.c", "Ana"), "Inquiry");
        for i in 0..n {
            if i % 2 == 0 {
                conv.push(Message::prospect(format!("prospect {i}")));
            } else {
                conv.push(Message::sent(format!("reply {i}")));
            }
        }
        conv
    }

    #[test]
    fn system_prompt_comes_first() {
        let conv = conversation_with(2);
        let ctx = build_context(&conv, "You are helpful", None);
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx[0].role, ChatRole::System);
        assert_eq!(ctx[0].content, "You are helpful");
        assert_eq!(ctx[1].role, ChatRole::User);
        assert_eq!(ctx[2].role, ChatRole::Assistant);
    }

    #[test]
    fn window_keeps_most_recent() {
        let conv = conversation_with(10);
        let ctx = build_context(&conv, "sys", Some(4));
        assert_eq!(ctx.len(), 5);
        // Last message of the thread is the last in context
        assert_eq!(ctx[4].content, "reply 9");
        assert_eq!(ctx[1].content, "prospect 6");
    }

    #[test]
    fn window_larger_than_history_is_harmless() {
        let conv = conversation_with(2);
        let ctx = build_context(&conv, "sys", Some(50));
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn history_json_omits_system_slot() {
        let conv = conversation_with(2);
        let json = history_json(&conv, 6);
        assert!(json.contains("prospect 0"));
        assert!(!json.contains("system"));
    }
}
