//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation to an LLM and get a raw reply
//! back. Replies are opaque JSON payloads; the normalizer in
//! `leadline-providers` turns them into canonical text or typed objects.
//!
//! Implementations: any OpenAI-compatible endpoint (xAI/Grok, OpenAI, Groq).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::{Message, Role};
use crate::schema::OutputSchema;

/// Chat role on the wire, as LLM APIs understand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role/content pair in the request history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Map a domain message to its wire role: prospect messages arrive as
    /// `user`, anything we drafted or sent is `assistant`.
    pub fn from_domain(message: &Message) -> Self {
        match message.role {
            Role::Prospect => Self::user(message.content.clone()),
            Role::Generated | Role::Sent => Self::assistant(message.content.clone()),
        }
    }
}

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The model to use (e.g. "grok-3-mini", "gpt-4o-mini"). Empty means
    /// "use the provider's configured default" — this is what the pipeline
    /// sends, so a failover hop picks the fallback provider's own model.
    #[serde(default)]
    pub model: String,

    /// System prompt plus mapped conversation history
    pub messages: Vec<ChatMessage>,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// The structured shape the caller expects back
    pub schema: OutputSchema,
}

fn default_temperature() -> f32 {
    0.3
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, schema: OutputSchema) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
            schema,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// A request that lets each provider pick its own configured model.
    pub fn using_default_model(messages: Vec<ChatMessage>, schema: OutputSchema) -> Self {
        Self::new("", messages, schema)
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A raw reply from a provider.
///
/// `payload` is the provider's response body, untouched. It may be a bare
/// structured object, a plain mapping, or a `choices[0].message.content`
/// wrapper — the normalizer sniffs the shape. Ephemeral: normalized then
/// discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReply {
    pub payload: serde_json::Value,

    /// Which provider actually answered (matters after failover)
    pub provider: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    pub usage: Option<TokenUsage>,
}

/// The core Provider trait.
///
/// Every LLM backend implements this. The failover adapter and the pipeline
/// call `generate()` without knowing which backend is underneath.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g. "grok", "openai").
    fn name(&self) -> &str;

    /// Send a request and get the raw reply payload.
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<ProviderReply, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
