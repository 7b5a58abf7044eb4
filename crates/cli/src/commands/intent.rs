//! `leadline intent` — Detect the prospect's primary intent.

use std::path::Path;
use std::sync::Arc;

use leadline_config::AppConfig;
use leadline_pipeline::{apply_intent, Classifier};
use leadline_providers::build_adapter;

use super::{load_transcript, save_transcript};

pub async fn run(transcript: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut conversation = load_transcript(transcript)?;

    let adapter = Arc::new(build_adapter(&config)?);
    let classifier = Classifier::new(adapter)
        .with_history_window(config.conversation.history_window);

    let report = classifier.detect_intent(&conversation).await?;

    match report.primary_intent {
        Some(intent) => println!("Primary intent: {intent:?}"),
        None => println!("Primary intent: undetermined"),
    }
    if let Some(confidence) = report.confidence {
        println!("Confidence:     {confidence:.2}");
    }
    if let Some(reasoning) = &report.reasoning {
        println!("Reasoning:      {reasoning}");
    }
    if let Some(time) = &report.best_time_to_visit {
        println!("Best time:      {time}");
    }

    apply_intent(&mut conversation, &report);
    save_transcript(transcript, &conversation)?;
    Ok(())
}
