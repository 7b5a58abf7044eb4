//! LLM provider adapters for leadline.
//!
//! - [`openai_compat`] — HTTP client for any OpenAI-compatible
//!   `/chat/completions` endpoint (xAI/Grok, OpenAI, Groq, local servers)
//! - [`normalize`] — pure shape-sniffing over raw reply payloads
//! - [`failover`] — explicit primary → fallback adapter (one hop, bounded
//!   timeouts)
//! - [`router`] — builds providers and the failover adapter from config

pub mod failover;
pub mod normalize;
pub mod openai_compat;
pub mod router;

pub use failover::FailoverAdapter;
pub use normalize::{extract_text, extract_typed, sniff, ReplyShape};
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_adapter;
