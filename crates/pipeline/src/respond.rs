//! Drafts prospect-facing replies through the provider adapter.

use std::sync::Arc;

use leadline_core::error::Result;
use leadline_core::message::{Conversation, ConversationId};
use leadline_core::provider::{ChatMessage, GenerateRequest};
use leadline_core::review::PendingReply;
use leadline_core::schema::{Outcome, OutputSchema};
use leadline_providers::failover::FailoverAdapter;
use leadline_providers::normalize;
use tracing::info;

use crate::context;
use crate::prompts;

/// A drafted reply awaiting human review before sending.
#[derive(Debug, Clone)]
pub struct Draft {
    pub text: String,
    /// Which provider produced the draft
    pub provider: String,
}

impl Draft {
    /// Queue this draft for human review.
    pub fn into_pending(self, conversation_id: ConversationId) -> PendingReply {
        PendingReply::new(conversation_id, self.text, self.provider)
    }
}

/// Generates conversational replies and closing messages.
pub struct Responder {
    adapter: Arc<FailoverAdapter>,
    temperature: f32,
    max_tokens: u32,
}

impl Responder {
    pub fn new(adapter: Arc<FailoverAdapter>) -> Self {
        Self {
            adapter,
            temperature: 0.3,
            max_tokens: 120,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Draft the next reply in an ongoing conversation.
    pub async fn generate_reply(&self, conversation: &Conversation) -> Result<Draft> {
        let messages = context::build_context(conversation, prompts::SALES_SYSTEM_PROMPT, None);
        let request = GenerateRequest::using_default_model(messages, OutputSchema::FreeText)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let reply = self.adapter.generate(request).await?;
        let text = normalize::extract_text(&reply.payload)?;

        info!(
            conversation = %conversation.id,
            provider = %reply.provider,
            chars = text.len(),
            "Reply drafted"
        );
        Ok(Draft {
            text,
            provider: reply.provider,
        })
    }

    /// Draft the closing message for a conversation that is ending with the
    /// given outcome. Only the tail of the thread is sent; the closing prompt
    /// carries the full framing.
    pub async fn generate_closing(
        &self,
        conversation: &Conversation,
        outcome: Outcome,
    ) -> Result<Draft> {
        let mut messages =
            context::build_context(conversation, prompts::closing_prompt_for(outcome), Some(3));
        messages.push(ChatMessage::user(format!(
            "Generate the closing message for {}.",
            conversation.prospect.first_name
        )));

        let request = GenerateRequest::using_default_model(messages, OutputSchema::FreeText)
            .with_temperature(0.2)
            .with_max_tokens(100);

        let reply = self.adapter.generate(request).await?;
        let text = normalize::extract_text(&reply.payload)?;

        info!(
            conversation = %conversation.id,
            outcome = ?outcome,
            provider = %reply.provider,
            "Closing message drafted"
        );
        Ok(Draft {
            text,
            provider: reply.provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leadline_core::error::ProviderError;
    use leadline_core::message::{Message, Prospect};
    use leadline_core::provider::{Provider, ProviderReply};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingProvider {
        reply: String,
        last_request: Mutex<Option<GenerateRequest>>,
    }

    impl RecordingProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> std::result::Result<ProviderReply, ProviderError> {
            *self.last_request.lock().unwrap() = Some(request);
            Ok(ProviderReply {
                payload: json!({"response": self.reply}),
                provider: "recording".into(),
                model: "test".into(),
                usage: None,
            })
        }
    }

    fn conversation() -> Conversation {
        let mut conv = Conversation::new(Prospect::new("j@x.com", "Jordan"), "Inquiry");
        conv.push(Message::prospect("I want to lose weight"));
        conv.push(Message::sent("Great goal! Our classes burn serious calories."));
        conv.push(Message::prospect("Sounds good, when can I come?"));
        conv
    }

    #[tokio::test]
    async fn drafts_reply_with_full_context() {
        let provider = Arc::new(RecordingProvider::new("How about Tuesday evening?"));
        let adapter = Arc::new(FailoverAdapter::new(
            provider.clone(),
            Duration::from_secs(5),
        ));
        let draft = Responder::new(adapter)
            .generate_reply(&conversation())
            .await
            .unwrap();
        assert_eq!(draft.text, "How about Tuesday evening?");
        assert_eq!(draft.provider, "recording");

        let request = provider.last_request.lock().unwrap().take().unwrap();
        // system prompt + three history messages
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.schema, OutputSchema::FreeText);
    }

    #[test]
    fn draft_queues_for_review() {
        use leadline_core::review::ReviewStatus;
        let conv = conversation();
        let draft = Draft {
            text: "How about Tuesday?".into(),
            provider: "grok".into(),
        };
        let pending = draft.into_pending(conv.id.clone());
        assert_eq!(pending.status, ReviewStatus::Pending);
        assert_eq!(pending.draft, "How about Tuesday?");
        assert_eq!(pending.provider, "grok");
        assert_eq!(pending.conversation_id, conv.id);
    }

    #[tokio::test]
    async fn closing_uses_outcome_prompt_and_tail_window() {
        let provider = Arc::new(RecordingProvider::new("See you Tuesday, Jordan!"));
        let adapter = Arc::new(FailoverAdapter::new(
            provider.clone(),
            Duration::from_secs(5),
        ));
        let draft = Responder::new(adapter)
            .generate_closing(&conversation(), Outcome::AgreedToFreeClass)
            .await
            .unwrap();
        assert_eq!(draft.text, "See you Tuesday, Jordan!");

        let request = provider.last_request.lock().unwrap().take().unwrap();
        // system + 3-message tail + closing instruction
        assert_eq!(request.messages.len(), 5);
        assert!(request.messages[0].content.contains("agreed"));
        assert!(
            request
                .messages
                .last()
                .unwrap()
                .content
                .contains("Jordan")
        );
    }
}
