//! # Leadline Pipeline
//!
//! The response-generation and classification pipeline: conversation history
//! goes in, a typed classification and a drafted reply come out, and the
//! orchestrator folds the result back into conversation state.
//!
//! Data flow: caller supplies a [`Conversation`](leadline_core::Conversation)
//! → [`context`] maps it to chat messages → the failover adapter issues the
//! request → the normalizer yields text or a typed object → [`classify`]
//! validates it against the closed enum sets → [`orchestrate::apply`]
//! persists the outcome and appends the draft for human review.

pub mod classify;
pub mod context;
pub mod orchestrate;
pub mod prompts;
pub mod respond;
pub mod scoring;

pub use classify::Classifier;
pub use orchestrate::{apply, apply_intent, record_review, sweep_cold, Applied, Limits};
pub use respond::{Draft, Responder};
pub use scoring::{calculate_lead_score, LeadScore};
