//! `leadline reply` — Draft the next reply for a transcript.

use std::path::Path;
use std::sync::Arc;

use leadline_config::AppConfig;
use leadline_pipeline::Responder;
use leadline_providers::build_adapter;

use super::load_transcript;

pub async fn run(transcript: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let conversation = load_transcript(transcript)?;

    if conversation.is_terminal() {
        println!(
            "Conversation is already complete (outcome: {:?})",
            conversation.outcome
        );
        return Ok(());
    }

    let adapter = Arc::new(build_adapter(&config)?);
    let responder = Responder::new(adapter)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);

    let draft = responder.generate_reply(&conversation).await?;

    println!("Draft reply (via {}):\n", draft.provider);
    println!("{}", draft.text);
    Ok(())
}
