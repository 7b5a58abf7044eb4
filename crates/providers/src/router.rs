//! Builds providers and the failover adapter from configuration.

use std::sync::Arc;
use std::time::Duration;

use leadline_config::AppConfig;
use leadline_core::error::{Error, ProviderError};
use leadline_core::provider::Provider;

use crate::failover::FailoverAdapter;
use crate::openai_compat::OpenAiCompatProvider;

/// Build one provider by name from config.
fn build_provider(config: &AppConfig, name: &str) -> Result<Arc<dyn Provider>, Error> {
    let provider_config = config.providers.get(name);

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .ok_or_else(|| {
            Error::Provider(ProviderError::NotConfigured(format!(
                "No API key for provider '{name}' — set it in config.toml or the environment"
            )))
        })?;

    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    Ok(Arc::new(
        OpenAiCompatProvider::new(name, base_url, api_key).with_model(model_for(config, name)),
    ))
}

/// The model a provider should use, from config or its well-known default.
pub fn model_for(config: &AppConfig, name: &str) -> String {
    config
        .providers
        .get(name)
        .and_then(|p| p.model.clone())
        .unwrap_or_else(|| default_model(name))
}

/// Build the primary→fallback adapter from config. The fallback provider is
/// optional: a missing key there degrades to a single-provider adapter
/// rather than an error.
pub fn build_adapter(config: &AppConfig) -> Result<FailoverAdapter, Error> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let primary = build_provider(config, &config.primary_provider)?;

    let mut adapter = FailoverAdapter::new(primary, timeout);
    match build_provider(config, &config.fallback_provider) {
        Ok(fallback) => adapter = adapter.with_fallback(fallback),
        Err(e) => {
            tracing::warn!(
                provider = %config.fallback_provider,
                error = %e,
                "Fallback provider not configured, continuing without it"
            );
        }
    }

    Ok(adapter)
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "grok" | "xai" => "https://api.x.ai/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

/// Default model per provider, matching the hosted deployment.
fn default_model(provider_name: &str) -> String {
    match provider_name {
        "grok" | "xai" => "grok-3-mini".into(),
        "openai" => "gpt-4o-mini".into(),
        _ => "gpt-4o-mini".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_config::ProviderConfig;

    fn config_with_keys() -> AppConfig {
        let mut config = AppConfig::default();
        config.providers.insert(
            "grok".into(),
            ProviderConfig {
                api_key: Some("xai-test".into()),
                api_url: None,
                model: Some("grok-3-mini".into()),
            },
        );
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-test".into()),
                api_url: None,
                model: None,
            },
        );
        config
    }

    #[test]
    fn builds_adapter_with_both_providers() {
        let adapter = build_adapter(&config_with_keys()).unwrap();
        assert_eq!(adapter.primary_name(), "grok");
        assert_eq!(adapter.fallback_name(), Some("openai"));
    }

    #[test]
    fn missing_fallback_key_degrades_gracefully() {
        let mut config = config_with_keys();
        config.providers.remove("openai");
        let adapter = build_adapter(&config).unwrap();
        assert_eq!(adapter.primary_name(), "grok");
        assert!(adapter.fallback_name().is_none());
    }

    #[test]
    fn missing_primary_key_is_an_error() {
        let config = AppConfig::default();
        match build_adapter(&config).unwrap_err() {
            Error::Provider(ProviderError::NotConfigured(msg)) => {
                assert!(msg.contains("grok"));
            }
            other => panic!("Expected NotConfigured, got: {other:?}"),
        }
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("grok").contains("api.x.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("groq").contains("api.groq.com"));
    }

    #[test]
    fn model_resolution_prefers_config() {
        let config = config_with_keys();
        assert_eq!(model_for(&config, "grok"), "grok-3-mini");
        assert_eq!(model_for(&config, "openai"), "gpt-4o-mini");
    }
}
