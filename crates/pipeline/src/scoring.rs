//! Heuristic lead scoring over conversation patterns.
//!
//! Entirely offline: no provider calls, just weighted signals over the
//! thread. Weights favor response latency and a clear outcome; everything
//! else nudges.

use leadline_core::message::{Conversation, Role};
use leadline_core::schema::Outcome;

/// Result of scoring a conversation.
#[derive(Debug, Clone)]
pub struct LeadScore {
    /// 0.0 to 1.0
    pub score: f32,
    /// Human-readable signals that contributed
    pub factors: Vec<String>,
    /// Suggested follow-up actions
    pub recommendations: Vec<String>,
    /// score >= 0.7
    pub is_hot: bool,
    pub interpretation: &'static str,
}

const HOT_THRESHOLD: f32 = 0.7;

/// Score a conversation from its timing, engagement, and content signals.
pub fn calculate_lead_score(conversation: &Conversation) -> LeadScore {
    // Base score for any engaged lead
    let mut score: f32 = 0.3;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    let first_reply = conversation
        .messages
        .iter()
        .find(|m| m.role == Role::Prospect);

    // Response latency carries the highest weight
    if let Some(reply) = first_reply {
        let secs = (reply.timestamp - conversation.created_at).num_seconds();
        if secs < 300 {
            score += 0.25;
            factors.push("Very fast response (<5 min)".to_string());
            recommendations.push("Call immediately - high engagement".to_string());
        } else if secs < 900 {
            score += 0.2;
            factors.push("Fast response (<15 min)".to_string());
            recommendations.push("Priority follow-up".to_string());
        } else if secs < 3600 {
            score += 0.15;
            factors.push("Quick response (<1 hr)".to_string());
        } else if secs < 86_400 {
            score += 0.05;
            factors.push("Same-day response".to_string());
        }
    }

    if conversation.prospect.phone.is_some() {
        score += 0.15;
        factors.push("Phone provided".to_string());
        recommendations.push("SMS follow-up available".to_string());
    }

    match conversation.outcome {
        Some(Outcome::AgreedToFreeClass) => {
            score += 0.3;
            factors.push("Agreed to free class".to_string());
            recommendations.push("Schedule ASAP - ready to convert".to_string());
        }
        Some(Outcome::NotInterested) => {
            score -= 0.2;
            factors.push("Not interested".to_string());
            recommendations.push("Add to nurture campaign".to_string());
        }
        _ => {}
    }

    let prospect_messages = conversation
        .messages
        .iter()
        .filter(|m| m.role == Role::Prospect)
        .count();
    if prospect_messages >= 3 {
        score += 0.15;
        factors.push(format!("High engagement ({prospect_messages} messages)"));
    } else if prospect_messages == 2 {
        score += 0.1;
        factors.push(format!("Good engagement ({prospect_messages} messages)"));
    } else if prospect_messages == 1 {
        score += 0.05;
        factors.push("Responded to outreach".to_string());
    }

    // Long messages show investment
    let has_long_message = conversation
        .messages
        .iter()
        .any(|m| m.role == Role::Prospect && m.content.len() > 50);
    if has_long_message {
        score += 0.05;
        factors.push("Detailed responses".to_string());
    }

    if let Some(signals) = detect_buying_signals(conversation) {
        score += 0.15;
        if signals.keywords.contains(&"schedule") {
            recommendations.push("Ready to schedule - mention available times".to_string());
        }
        factors.extend(signals.factors);
    }

    // Business-hours responders tend to be more serious
    if let Some(reply) = first_reply {
        use chrono::Timelike;
        let hour = reply.timestamp.hour();
        if (9..=17).contains(&hour) {
            score += 0.05;
            factors.push("Business hours response".to_string());
        }
    }

    let score = score.clamp(0.0, 1.0);
    let interpretation = if score >= 0.8 {
        "VERY HOT - Contact immediately"
    } else if score >= HOT_THRESHOLD {
        "HOT - Priority follow-up needed"
    } else if score >= 0.6 {
        "WARM - Good potential"
    } else if score >= 0.4 {
        "LUKEWARM - Needs nurturing"
    } else {
        "COLD - Low priority"
    };

    LeadScore {
        score,
        factors,
        recommendations,
        is_hot: score >= HOT_THRESHOLD,
        interpretation,
    }
}

struct BuyingSignals {
    factors: Vec<String>,
    keywords: Vec<&'static str>,
}

const SIGNAL_GROUPS: &[(&str, &str, &[&str])] = &[
    (
        "schedule",
        "Asking about scheduling",
        &["when", "what time", "schedule", "book", "sign up", "available"],
    ),
    (
        "price",
        "Price conscious (address value)",
        &["cost", "price", "how much", "fee", "payment", "afford"],
    ),
    (
        "commitment",
        "Shows commitment",
        &[
            "ready",
            "start",
            "begin",
            "join",
            "lets do",
            "let's do",
            "sounds good",
            "yes",
            "sure",
            "absolutely",
        ],
    ),
    (
        "urgency",
        "Urgent timeline",
        &["today", "tomorrow", "this week", "soon", "asap", "right away"],
    ),
    (
        "comparison",
        "Comparing options",
        &["better than", "compared to", "vs", "other gyms", "why you"],
    ),
];

/// Scan the three most recent prospect messages for buying-signal keywords.
fn detect_buying_signals(conversation: &Conversation) -> Option<BuyingSignals> {
    let recent: Vec<String> = conversation
        .messages
        .iter()
        .rev()
        .filter(|m| m.role == Role::Prospect)
        .take(3)
        .map(|m| m.content.to_lowercase())
        .collect();

    let mut factors = Vec::new();
    let mut keywords = Vec::new();
    for content in &recent {
        for (signal, factor, words) in SIGNAL_GROUPS {
            if keywords.contains(signal) {
                continue;
            }
            if words.iter().any(|w| content.contains(w)) {
                keywords.push(*signal);
                factors.push((*factor).to_string());
            }
        }
    }

    if factors.is_empty() {
        None
    } else {
        Some(BuyingSignals { factors, keywords })
    }
}
