//! Response normalization — pure shape-sniffing over raw provider payloads.
//!
//! Providers return heterogeneous shapes: a structured object carrying the
//! text under a known attribute, a plain mapping with a known key, or the
//! OpenAI-style `choices[0].message.content` wrapper. Detection runs in that
//! fixed priority order; the first match wins, and anything else is an
//! [`UnrecognizedResponseShape`](NormalizeError::UnrecognizedResponseShape)
//! carrying the raw payload. There is no fallthrough default and never an
//! empty-string guess.
//!
//! Everything in this module is pure — no I/O — so it can be tested in
//! isolation against captured provider fixtures.

use leadline_core::error::NormalizeError;
use leadline_core::schema::OutputSchema;
use serde::Deserialize;
use serde_json::Value;

/// The known payload shapes, decoded as a tagged union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyShape {
    /// Structured object exposing the text under `response`
    Structured(String),
    /// Plain mapping with a `content` key
    Mapping(String),
    /// Nested `choices[0].message.content` wrapper
    ChoiceWrapper(String),
}

impl ReplyShape {
    /// The canonical text, whichever variant carried it.
    pub fn into_text(self) -> String {
        match self {
            ReplyShape::Structured(s) | ReplyShape::Mapping(s) | ReplyShape::ChoiceWrapper(s) => s,
        }
    }
}

/// Detect which known shape a raw payload has.
pub fn sniff(raw: &Value) -> Result<ReplyShape, NormalizeError> {
    let Some(obj) = raw.as_object() else {
        return Err(unrecognized(raw));
    };

    if let Some(text) = obj.get("response").and_then(Value::as_str) {
        return Ok(ReplyShape::Structured(text.to_string()));
    }

    if let Some(text) = obj.get("content").and_then(Value::as_str) {
        return Ok(ReplyShape::Mapping(text.to_string()));
    }

    if let Some(choices) = obj.get("choices").and_then(Value::as_array) {
        let content = choices
            .first()
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str);
        return match content {
            Some(text) => Ok(ReplyShape::ChoiceWrapper(text.to_string())),
            // A choices array without message content is still unrecognized
            None => Err(unrecognized(raw)),
        };
    }

    Err(unrecognized(raw))
}

/// Extract the canonical reply text from a raw payload.
pub fn extract_text(raw: &Value) -> Result<String, NormalizeError> {
    sniff(raw).map(ReplyShape::into_text)
}

/// Extract a typed object from a raw payload.
///
/// An object that is none of the three text-bearing shapes is treated as the
/// typed object itself (a provider honoring a structured-output request).
/// Otherwise the canonical text is extracted, markdown code fences are
/// stripped, and the remainder is decoded as JSON.
pub fn extract_typed<T: for<'de> Deserialize<'de>>(
    raw: &Value,
    schema: OutputSchema,
) -> Result<T, NormalizeError> {
    match sniff(raw) {
        Ok(shape) => {
            let text = shape.into_text();
            let stripped = strip_code_fences(&text);
            serde_json::from_str(stripped).map_err(|e| validation_failed(schema, e))
        }
        Err(_) if raw.is_object() => {
            serde_json::from_value(raw.clone()).map_err(|e| validation_failed(schema, e))
        }
        Err(e) => Err(e),
    }
}

/// Check that a payload satisfies the requested schema, without committing
/// to the caller's typed decode. Used by the failover adapter: structural
/// failure on the primary triggers the one fallback hop.
///
/// Enum membership is deliberately not checked here — an unknown intent or
/// outcome string is a classification error, not a transport retry.
pub fn validate(raw: &Value, schema: OutputSchema) -> Result<(), NormalizeError> {
    match schema {
        OutputSchema::FreeText => extract_text(raw).map(|_| ()),
        OutputSchema::OutcomeAssessment => {
            extract_typed::<AssessmentShape>(raw, schema).map(|_| ())
        }
        OutputSchema::IntentDetection => {
            extract_typed::<serde_json::Map<String, Value>>(raw, schema).map(|_| ())
        }
    }
}

/// Structural check for an outcome assessment: the outcome field must exist
/// as a string; its value is validated downstream.
#[derive(Deserialize)]
struct AssessmentShape {
    #[serde(default)]
    #[allow(dead_code)]
    should_end: bool,
    #[allow(dead_code)]
    outcome: String,
}

/// Strip a leading/trailing markdown code fence, with or without a language
/// tag. Models wrap JSON in ```json blocks despite instructions.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        && let Some(inner) = inner.strip_suffix("```")
    {
        return inner.trim();
    }
    trimmed
}

fn unrecognized(raw: &Value) -> NormalizeError {
    NormalizeError::UnrecognizedResponseShape {
        payload: raw.clone(),
    }
}

fn validation_failed(schema: OutputSchema, e: serde_json::Error) -> NormalizeError {
    NormalizeError::SchemaValidationFailed {
        schema: schema.to_string(),
        reason: e.to_string(),
    }
}
