//! `leadline assess` — Classify the outcome of a prospect's latest reply.

use std::path::Path;
use std::sync::Arc;

use leadline_config::AppConfig;
use leadline_core::message::Role;
use leadline_pipeline::{apply, Applied, Classifier, Limits, Responder};
use leadline_providers::build_adapter;

use super::{load_transcript, save_transcript};

pub async fn run(transcript: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut conversation = load_transcript(transcript)?;

    let latest = conversation
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Prospect)
        .map(|m| m.content.clone())
        .ok_or("Transcript has no prospect messages to assess")?;

    let adapter = Arc::new(build_adapter(&config)?);
    let classifier = Classifier::new(adapter.clone())
        .with_history_window(config.conversation.history_window);

    let assessment = classifier.assess_outcome(&conversation, &latest).await?;

    println!("Outcome:    {:?}", assessment.outcome);
    println!("Should end: {}", assessment.should_end);
    if let Some(reasoning) = &assessment.reasoning {
        println!("Reasoning:  {reasoning}");
    }

    let limits = Limits {
        max_message_exchanges: config.conversation.max_message_exchanges as usize,
    };

    // Draft the closing message when the thread is ending
    let limit_hit = conversation.message_count() >= limits.message_ceiling();
    let draft = if assessment.should_end || limit_hit {
        let outcome = if limit_hit && !assessment.outcome.is_terminal() {
            leadline_core::schema::Outcome::ReachedMessageLimit
        } else {
            assessment.outcome
        };
        let responder = Responder::new(adapter);
        Some(responder.generate_closing(&conversation, outcome).await?)
    } else {
        None
    };

    match apply(&mut conversation, &assessment, draft.as_ref(), limits) {
        Applied::Completed(outcome) => {
            println!("\nConversation completed: {outcome:?}");
            if let Some(d) = &draft {
                println!("Closing draft (via {}):\n{}", d.provider, d.text);
            }
        }
        Applied::Continued => println!("\nConversation continues."),
        Applied::AlreadyTerminal => println!("\nConversation was already complete."),
    }

    save_transcript(transcript, &conversation)?;
    Ok(())
}
