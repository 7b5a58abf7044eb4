//! # Leadline Core
//!
//! Domain types, traits, and error definitions for the leadline
//! prospect-qualification pipeline. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The LLM backend is defined as a trait here; HTTP implementations live in
//! `leadline-providers`. Classification results and conversation outcomes are
//! closed sum types validated at the boundary — unknown values are rejected,
//! never coerced.

pub mod error;
pub mod message;
pub mod provider;
pub mod review;
pub mod schema;

// Re-export key types at crate root for ergonomics
pub use error::{ClassifyError, Error, NormalizeError, ProviderError, Result};
pub use message::{Conversation, ConversationId, ConversationStatus, Message, Prospect, Role};
pub use provider::{ChatMessage, ChatRole, GenerateRequest, Provider, ProviderReply, TokenUsage};
pub use review::{PendingReply, ReviewStatus};
pub use schema::{Intent, IntentReport, Outcome, OutcomeAssessment, OutputSchema};
