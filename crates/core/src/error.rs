//! Error types for the leadline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. None of these are ever
//! swallowed — they surface to the orchestrator, which leaves conversation
//! state unchanged on any of them.

use thiserror::Error;

/// The top-level error type for all leadline operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Response normalization errors ---
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    // --- Classification errors ---
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("All providers failed; primary: {primary}; fallback: {fallback}")]
    Unavailable { primary: String, fallback: String },
}

/// Errors from decoding a raw provider payload into canonical text or a
/// typed object. The raw payload travels with the error for diagnostics;
/// the normalizer never guesses a default string.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Unrecognized response shape: {payload}")]
    UnrecognizedResponseShape { payload: serde_json::Value },

    #[error("Payload failed validation against schema {schema}: {reason}")]
    SchemaValidationFailed { schema: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Classification value outside the closed enum set: {value}")]
    InvalidClassification { value: String },

    #[error("Classifier received an empty conversation history")]
    EmptyHistory,
}
