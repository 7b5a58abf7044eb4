//! OpenAI-compatible provider implementation.
//!
//! Works with: xAI (Grok), OpenAI, Groq, and any other endpoint exposing an
//! OpenAI-compatible `/v1/chat/completions` API. The two providers of the
//! hosted deployment — Grok primary, OpenAI fallback — both speak this
//! dialect, so a single implementation covers the whole chain.
//!
//! `generate()` returns the response body untouched as a raw JSON payload;
//! the [`normalize`](crate::normalize) module owns shape extraction.

use async_trait::async_trait;
use leadline_core::error::ProviderError;
use leadline_core::provider::{GenerateRequest, Provider, ProviderReply, TokenUsage};
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    default_model: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_model: None,
            client,
        }
    }

    /// Set the model used when a request leaves the model field empty.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Create a Grok (xAI) provider (convenience constructor).
    pub fn grok(api_key: impl Into<String>) -> Self {
        Self::new("grok", "https://api.x.ai/v1", api_key)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<ProviderReply, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        // An empty model in the request means "use this provider's default"
        let model = if request.model.is_empty() {
            self.default_model.clone().ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "Provider '{}' has no model configured",
                    self.name
                ))
            })?
        } else {
            request.model.clone()
        };

        let mut body = serde_json::json!({
            "model": model,
            "messages": request.messages,
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(
            provider = %self.name,
            model = %model,
            schema = %request.schema,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response body: {e}"),
            })?;

        // Pull model/usage metadata out without consuming the payload;
        // shape extraction is the normalizer's job.
        let meta: ResponseMeta =
            serde_json::from_value(payload.clone()).unwrap_or_default();

        Ok(ProviderReply {
            payload,
            provider: self.name.clone(),
            model: meta.model.unwrap_or(model),
            usage: meta.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- API metadata types (internal) ---

#[derive(Debug, Default, Deserialize)]
struct ResponseMeta {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grok_constructor() {
        let provider = OpenAiCompatProvider::grok("xai-test");
        assert_eq!(provider.name(), "grok");
        assert!(provider.base_url().contains("api.x.ai"));
    }

    #[test]
    fn openai_constructor() {
        let provider = OpenAiCompatProvider::openai("sk-test");
        assert_eq!(provider.name(), "openai");
        assert!(provider.base_url().contains("api.openai.com"));
    }

    #[test]
    fn trailing_slash_trimmed_from_base_url() {
        let provider = OpenAiCompatProvider::new("local", "http://localhost:8000/v1/", "key");
        assert_eq!(provider.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn response_meta_parses_usage() {
        let body = serde_json::json!({
            "model": "grok-3-mini",
            "choices": [{"message": {"content": "Hi"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        });
        let meta: ResponseMeta = serde_json::from_value(body).unwrap();
        assert_eq!(meta.model.as_deref(), Some("grok-3-mini"));
        assert_eq!(meta.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn response_meta_tolerates_missing_fields() {
        let meta: ResponseMeta = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(meta.model.is_none());
        assert!(meta.usage.is_none());
    }
}
