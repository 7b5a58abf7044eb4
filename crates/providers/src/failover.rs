//! Provider failover — an explicit two-step pipeline with per-attempt
//! timeouts.
//!
//! The primary provider is tried first; on error, timeout, or a payload that
//! fails the requested schema's structural check, exactly one fallback
//! attempt is made. There are no retry loops. When both steps fail the
//! caller gets [`ProviderError::Unavailable`] naming both failures; a
//! payload that is still malformed after the fallback hop surfaces as a
//! normalization error instead.

use std::sync::Arc;
use std::time::Duration;

use leadline_core::error::{Error, ProviderError};
use leadline_core::provider::{GenerateRequest, Provider, ProviderReply};
use tracing::{info, warn};

use crate::normalize;

/// Wraps a primary and an optional fallback provider behind one `generate`
/// call. Never mutates conversation state; its only side effect is the
/// network call.
pub struct FailoverAdapter {
    primary: Arc<dyn Provider>,
    fallback: Option<Arc<dyn Provider>>,
    timeout: Duration,
}

impl std::fmt::Debug for FailoverAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverAdapter")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|p| p.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Why a single attempt failed.
enum AttemptFailure {
    Provider(ProviderError),
    /// The call succeeded but the payload failed the schema's structural
    /// check; carried so the final error can name it.
    BadPayload(leadline_core::error::NormalizeError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Provider(e) => write!(f, "{e}"),
            AttemptFailure::BadPayload(e) => write!(f, "{e}"),
        }
    }
}

impl FailoverAdapter {
    pub fn new(primary: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self {
            primary,
            fallback: None,
            timeout,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Provider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback.as_deref().map(Provider::name)
    }

    /// One bounded attempt against one provider, validated against the
    /// requested schema.
    async fn attempt(
        &self,
        provider: &Arc<dyn Provider>,
        request: GenerateRequest,
    ) -> Result<ProviderReply, AttemptFailure> {
        let schema = request.schema;
        let reply = match tokio::time::timeout(self.timeout, provider.generate(request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(AttemptFailure::Provider(e)),
            Err(_) => {
                return Err(AttemptFailure::Provider(ProviderError::Timeout(format!(
                    "Provider '{}' timed out after {}s",
                    provider.name(),
                    self.timeout.as_secs()
                ))));
            }
        };

        match normalize::validate(&reply.payload, schema) {
            Ok(()) => Ok(reply),
            Err(e) => Err(AttemptFailure::BadPayload(e)),
        }
    }

    /// Send a request: primary first, then at most one fallback hop.
    pub async fn generate(&self, request: GenerateRequest) -> Result<ProviderReply, Error> {
        info!(
            provider = %self.primary.name(),
            schema = %request.schema,
            "Failover: trying primary provider"
        );

        let primary_failure = match self.attempt(&self.primary, request.clone()).await {
            Ok(reply) => return Ok(reply),
            Err(failure) => {
                warn!(
                    provider = %self.primary.name(),
                    error = %failure,
                    "Failover: primary failed, trying fallback"
                );
                failure
            }
        };

        let Some(fallback) = &self.fallback else {
            return Err(match primary_failure {
                AttemptFailure::Provider(e) => ProviderError::Unavailable {
                    primary: format!("{}: {e}", self.primary.name()),
                    fallback: "not configured".into(),
                }
                .into(),
                AttemptFailure::BadPayload(e) => e.into(),
            });
        };

        info!(provider = %fallback.name(), "Failover: trying fallback provider");

        match self.attempt(fallback, request).await {
            Ok(reply) => Ok(reply),
            Err(AttemptFailure::BadPayload(e)) => {
                // Malformed even after the fallback hop: propagate the
                // normalization error, not a generic unavailability.
                warn!(provider = %fallback.name(), error = %e, "Failover: fallback payload malformed");
                Err(e.into())
            }
            Err(AttemptFailure::Provider(e)) => {
                warn!(provider = %fallback.name(), error = %e, "Failover: fallback failed");
                Err(ProviderError::Unavailable {
                    primary: format!("{}: {primary_failure}", self.primary.name()),
                    fallback: format!("{}: {e}", fallback.name()),
                }
                .into())
            }
        }
    }

    /// True when any provider in the pair answers its health check.
    pub async fn health_check(&self) -> bool {
        if let Ok(true) = self.primary.health_check().await {
            return true;
        }
        if let Some(fallback) = &self.fallback
            && let Ok(true) = fallback.health_check().await
        {
            return true;
        }
        false
    }
}
