//! Configuration loading, validation, and management for leadline.
//!
//! Loads configuration from `~/.leadline/config.toml` with environment
//! variable overrides. Validates all settings at load time. API keys are
//! redacted from `Debug` output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.leadline/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Primary LLM provider for reply generation
    #[serde(default = "default_primary_provider")]
    pub primary_provider: String,

    /// Secondary provider tried when the primary fails (one hop, no loops)
    #[serde(default = "default_fallback_provider")]
    pub fallback_provider: String,

    /// Default sampling temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Per-attempt timeout for provider calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Provider-specific configurations, keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Conversation limits and cold-lead sweep settings
    #[serde(default)]
    pub conversation: ConversationConfig,
}

fn default_primary_provider() -> String {
    "grok".into()
}
fn default_fallback_provider() -> String {
    "openai".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    120
}
fn default_request_timeout_secs() -> u64 {
    30
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("primary_provider", &self.primary_provider)
            .field("fallback_provider", &self.fallback_provider)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .field("conversation", &self.conversation)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Exchange limits and inactivity thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum back-and-forth exchanges before the thread is force-closed.
    /// Raw message count is compared against twice this value.
    #[serde(default = "default_max_message_exchanges")]
    pub max_message_exchanges: u32,

    /// Days of prospect silence before an active thread is marked cold
    #[serde(default = "default_cold_lead_threshold_days")]
    pub cold_lead_threshold_days: u32,

    /// Whether the cold-lead sweep runs at all
    #[serde(default)]
    pub cold_lead_sweep_enabled: bool,

    /// How many recent history entries the classifier keeps
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_max_message_exchanges() -> u32 {
    10
}
fn default_cold_lead_threshold_days() -> u32 {
    7
}
fn default_history_window() -> usize {
    6
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_message_exchanges: default_max_message_exchanges(),
            cold_lead_threshold_days: default_cold_lead_threshold_days(),
            cold_lead_sweep_enabled: false,
            history_window: default_history_window(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.leadline/config.toml).
    ///
    /// Environment variables override file values:
    /// - `XAI_API_KEY` fills the `grok` provider key
    /// - `OPENAI_API_KEY` fills the `openai` provider key
    /// - `LEADLINE_PRIMARY_PROVIDER` / `LEADLINE_FALLBACK_PROVIDER`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("XAI_API_KEY") {
            config.providers.entry("grok".into()).or_default().api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.providers.entry("openai".into()).or_default().api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("LEADLINE_PRIMARY_PROVIDER") {
            config.primary_provider = provider;
        }
        if let Ok(provider) = std::env::var("LEADLINE_FALLBACK_PROVIDER") {
            config.fallback_provider = provider;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".leadline")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.primary_provider == self.fallback_provider {
            return Err(ConfigError::ValidationError(
                "primary_provider and fallback_provider must differ".into(),
            ));
        }

        if self.conversation.max_message_exchanges == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_exchanges must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Whether any provider has an API key configured.
    pub fn has_api_key(&self) -> bool {
        self.providers.values().any(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            primary_provider: default_primary_provider(),
            fallback_provider: default_fallback_provider(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            providers: HashMap::new(),
            conversation: ConversationConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            model: None,
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary_provider, "grok");
        assert_eq!(config.fallback_provider, "openai");
        assert_eq!(config.conversation.max_message_exchanges, 10);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.primary_provider, config.primary_provider);
        assert_eq!(
            parsed.conversation.cold_lead_threshold_days,
            config.conversation.cold_lead_threshold_days
        );
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn identical_primary_and_fallback_rejected() {
        let config = AppConfig {
            fallback_provider: "grok".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_exchange_limit_rejected() {
        let mut config = AppConfig::default();
        config.conversation.max_message_exchanges = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().primary_provider, "grok");
    }

    #[test]
    fn provider_section_parsing() {
        let toml_str = r#"
primary_provider = "grok"
fallback_provider = "openai"

[providers.grok]
api_key = "xai-test"
model = "grok-3-mini"

[providers.openai]
api_key = "sk-test"
model = "gpt-4o-mini"

[conversation]
max_message_exchanges = 8
cold_lead_threshold_days = 5
cold_lead_sweep_enabled = true
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(
            config.providers["grok"].model.as_deref(),
            Some("grok-3-mini")
        );
        assert_eq!(config.conversation.max_message_exchanges, 8);
        assert!(config.conversation.cold_lead_sweep_enabled);
        assert!(config.has_api_key());
    }

    #[test]
    fn debug_output_redacts_api_keys() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "grok".into(),
            ProviderConfig {
                api_key: Some("xai-secret-key".into()),
                api_url: None,
                model: None,
            },
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("xai-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
