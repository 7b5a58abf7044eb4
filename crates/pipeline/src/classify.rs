//! Intent and outcome classification against closed enum sets.
//!
//! The classifier asks the adapter for a structured verdict, normalizes the
//! payload, and validates every enum-like string at the boundary. A value
//! outside the closed set fails with
//! [`ClassifyError::InvalidClassification`] rather than being coerced to a
//! default.

use std::sync::Arc;

use leadline_core::error::{ClassifyError, Error, Result};
use leadline_core::message::Conversation;
use leadline_core::provider::{ChatMessage, GenerateRequest};
use leadline_core::schema::{Intent, IntentReport, Outcome, OutcomeAssessment, OutputSchema};
use leadline_providers::failover::FailoverAdapter;
use leadline_providers::normalize;
use serde::Deserialize;
use tracing::{debug, info};

use crate::context;
use crate::prompts;

/// Classifies conversation outcomes and prospect intent via the provider
/// adapter.
pub struct Classifier {
    adapter: Arc<FailoverAdapter>,
    /// How many recent history entries go into the assessment prompt
    history_window: usize,
}

impl Classifier {
    pub fn new(adapter: Arc<FailoverAdapter>) -> Self {
        Self {
            adapter,
            history_window: 6,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Assess whether the conversation should end and with what outcome,
    /// given the prospect's latest reply.
    pub async fn assess_outcome(
        &self,
        conversation: &Conversation,
        latest_reply: &str,
    ) -> Result<OutcomeAssessment> {
        if conversation.messages.is_empty() {
            return Err(ClassifyError::EmptyHistory.into());
        }

        let history = context::history_json(conversation, self.history_window);
        let prompt = prompts::ASSESSMENT_PROMPT
            .replace("{conversation_history}", &history)
            .replace("{prospect_response}", latest_reply);

        let request = GenerateRequest::using_default_model(
            vec![
                ChatMessage::system("You are a conversation analyzer. Return only valid JSON."),
                ChatMessage::user(prompt),
            ],
            OutputSchema::OutcomeAssessment,
        )
        .with_temperature(0.1)
        .with_max_tokens(150);

        let reply = self.adapter.generate(request).await?;
        let raw: RawAssessment =
            normalize::extract_typed(&reply.payload, OutputSchema::OutcomeAssessment)
                .map_err(Error::from)?;

        let outcome = parse_enum::<Outcome>(&raw.outcome)?;

        // A terminal verdict implies the thread should end even when the
        // model forgot to set the flag.
        let assessment = OutcomeAssessment {
            should_end: raw.should_end || outcome.is_terminal(),
            outcome,
            reasoning: raw.reasoning,
        };

        info!(
            conversation = %conversation.id,
            outcome = ?assessment.outcome,
            should_end = assessment.should_end,
            provider = %reply.provider,
            "Conversation assessed"
        );
        Ok(assessment)
    }

    /// Detect the prospect's primary intent from the conversation history.
    pub async fn detect_intent(&self, conversation: &Conversation) -> Result<IntentReport> {
        if conversation.messages.is_empty() {
            return Err(ClassifyError::EmptyHistory.into());
        }

        let mut messages =
            context::build_context(conversation, prompts::SALES_SYSTEM_PROMPT, None);
        messages.push(ChatMessage::user(prompts::INTENT_REQUEST));

        let request = GenerateRequest::using_default_model(messages, OutputSchema::IntentDetection)
            .with_temperature(0.1)
            .with_max_tokens(200);

        let reply = self.adapter.generate(request).await?;
        let raw: RawIntentReport =
            normalize::extract_typed(&reply.payload, OutputSchema::IntentDetection)
                .map_err(Error::from)?;

        let primary_intent = raw
            .primary_intent
            .as_deref()
            .map(parse_enum::<Intent>)
            .transpose()?;

        let report = IntentReport {
            primary_intent,
            confidence: raw.confidence,
            reasoning: raw.reasoning,
            best_time_to_visit: raw.best_time_to_visit,
        };
        report
            .validate()
            .map_err(|reason| ClassifyError::InvalidClassification { value: reason })?;

        debug!(
            conversation = %conversation.id,
            intent = ?report.primary_intent,
            confidence = ?report.confidence,
            "Intent detected"
        );
        Ok(report)
    }
}

/// Structural decode of the assessment payload; the enum string is validated
/// separately so an unknown value reports `InvalidClassification` rather
/// than a serde parse error.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    #[serde(default)]
    should_end: bool,
    outcome: String,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIntentReport {
    #[serde(default, alias = "detected_intent")]
    primary_intent: Option<String>,
    #[serde(default, alias = "confidence_level")]
    confidence: Option<f32>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    best_time_to_visit: Option<String>,
}

/// Validate an enum-like string against a closed serde enum.
fn parse_enum<T: for<'de> Deserialize<'de>>(value: &str) -> std::result::Result<T, ClassifyError> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        ClassifyError::InvalidClassification {
            value: value.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leadline_core::error::ProviderError;
    use leadline_core::message::{Message, Prospect};
    use leadline_core::provider::{Provider, ProviderReply};
    use serde_json::json;
    use std::time::Duration;

    struct ScriptedProvider {
        payload: serde_json::Value,
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            _request: GenerateRequest,
        ) -> std::result::Result<ProviderReply, ProviderError> {
            Ok(ProviderReply {
                payload: self.payload.clone(),
                provider: "scripted".into(),
                model: "test".into(),
                usage: None,
            })
        }
    }

    fn classifier_with(payload: serde_json::Value) -> Classifier {
        let adapter = FailoverAdapter::new(
            Arc::new(ScriptedProvider { payload }),
            Duration::from_secs(5),
        );
        Classifier::new(Arc::new(adapter))
    }

    fn conversation() -> Conversation {
        let mut conv = Conversation::new(Prospect::new("s@x.com", "Sam"), "Inquiry");
        conv.push(Message::sent("Want to try a free class?"));
        conv.push(Message::prospect("Tuesday works for me"));
        conv
    }

    fn wrapped(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"content": content}}]})
    }

    #[tokio::test]
    async fn assesses_agreement_outcome() {
        let classifier = classifier_with(wrapped(
            r#"{"should_end": true, "outcome": "agreed_to_free_class", "reasoning": "scheduling"}"#,
        ));
        let assessment = classifier
            .assess_outcome(&conversation(), "Tuesday works for me")
            .await
            .unwrap();
        assert!(assessment.should_end);
        assert_eq!(assessment.outcome, Outcome::AgreedToFreeClass);
    }

    #[tokio::test]
    async fn terminal_outcome_forces_should_end() {
        let classifier = classifier_with(wrapped(
            r#"{"should_end": false, "outcome": "not_interested"}"#,
        ));
        let assessment = classifier
            .assess_outcome(&conversation(), "no thanks")
            .await
            .unwrap();
        assert!(assessment.should_end);
    }

    #[tokio::test]
    async fn unknown_outcome_is_invalid_classification() {
        let classifier =
            classifier_with(wrapped(r#"{"should_end": true, "outcome": "maybe_later"}"#));
        match classifier
            .assess_outcome(&conversation(), "hmm")
            .await
            .unwrap_err()
        {
            Error::Classify(ClassifyError::InvalidClassification { value }) => {
                assert_eq!(value, "maybe_later");
            }
            other => panic!("Expected InvalidClassification, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_history_is_rejected() {
        let classifier = classifier_with(wrapped("{}"));
        let empty = Conversation::new(Prospect::new("s@x.com", "Sam"), "Inquiry");
        assert!(matches!(
            classifier.assess_outcome(&empty, "hi").await.unwrap_err(),
            Error::Classify(ClassifyError::EmptyHistory)
        ));
    }

    #[tokio::test]
    async fn detects_intent_from_fenced_json() {
        let classifier = classifier_with(wrapped(
            "```json\n{\"detected_intent\": \"weight_loss\", \"confidence_level\": 0.85, \"reasoning\": \"stated goal\"}\n```",
        ));
        let report = classifier.detect_intent(&conversation()).await.unwrap();
        assert_eq!(report.primary_intent, Some(Intent::WeightLoss));
        assert_eq!(report.confidence, Some(0.85));
    }

    #[tokio::test]
    async fn unknown_intent_is_invalid_classification() {
        let classifier = classifier_with(wrapped(
            r#"{"detected_intent": "wants_a_pony", "confidence_level": 0.9}"#,
        ));
        assert!(matches!(
            classifier.detect_intent(&conversation()).await.unwrap_err(),
            Error::Classify(ClassifyError::InvalidClassification { .. })
        ));
    }

    #[tokio::test]
    async fn intent_may_be_absent() {
        let classifier = classifier_with(wrapped(r#"{"confidence_level": 0.2}"#));
        let report = classifier.detect_intent(&conversation()).await.unwrap();
        assert!(report.primary_intent.is_none());
    }
}
