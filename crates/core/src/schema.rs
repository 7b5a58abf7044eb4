//! Closed classification enums and the typed results the classifier emits.
//!
//! Intent and outcome are closed sum types validated at the serde boundary:
//! a value the enum doesn't name fails deserialization instead of being
//! coerced to some default. That failure surfaces as
//! [`ClassifyError::InvalidClassification`](crate::error::ClassifyError).

use serde::{Deserialize, Serialize};

/// The prospect's primary fitness goal, as detected from the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    WeightLoss,
    StressReliefMentalHealth,
    LearnBoxingTechnique,
    GeneralFitness,
    SocialCommunity,
    JustWantsFreeClass,
}

/// Where the conversation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AgreedToFreeClass,
    NotInterested,
    ReachedMessageLimit,
    Continue,
}

impl Outcome {
    /// Terminal outcomes close the conversation; `Continue` does not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// The structured shape a provider request asks for.
///
/// `FreeText` replies are normalized to a plain string; the other two decode
/// into [`IntentReport`] and [`OutcomeAssessment`] respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSchema {
    FreeText,
    IntentDetection,
    OutcomeAssessment,
}

impl std::fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputSchema::FreeText => "free_text",
            OutputSchema::IntentDetection => "intent_detection",
            OutputSchema::OutcomeAssessment => "outcome_assessment",
        };
        write!(f, "{name}")
    }
}

/// Typed result of intent detection. Produced per LLM call and consumed once
/// by the orchestrator; never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentReport {
    #[serde(default, alias = "detected_intent")]
    pub primary_intent: Option<Intent>,

    /// Model-reported confidence in `0.0..=1.0`.
    #[serde(default, alias = "confidence_level")]
    pub confidence: Option<f32>,

    #[serde(default)]
    pub reasoning: Option<String>,

    /// "morning" / "evening" / "weekend", when the prospect volunteered one.
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
}

impl IntentReport {
    /// Reject confidence values outside the unit interval.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(c) = self.confidence
            && !(0.0..=1.0).contains(&c)
        {
            return Err(format!("confidence {c} outside 0.0..=1.0"));
        }
        Ok(())
    }
}

/// Typed result of the end-of-conversation assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeAssessment {
    #[serde(default)]
    pub should_end: bool,

    pub outcome: Outcome,

    #[serde(default)]
    pub reasoning: Option<String>,
}

impl OutcomeAssessment {
    pub fn continuing() -> Self {
        Self {
            should_end: false,
            outcome: Outcome::Continue,
            reasoning: None,
        }
    }
}
