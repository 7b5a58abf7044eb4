pub mod assess;
pub mod doctor;
pub mod intent;
pub mod onboard;
pub mod reply;
pub mod score;
pub mod sweep;

use leadline_core::message::Conversation;
use std::path::Path;

/// Load a conversation transcript from a JSON file.
pub fn load_transcript(path: &Path) -> Result<Conversation, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read transcript {}: {e}", path.display()))?;
    let conversation: Conversation = serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid transcript {}: {e}", path.display()))?;
    tracing::debug!(
        conversation = %conversation.id,
        messages = conversation.message_count(),
        "Loaded transcript"
    );
    Ok(conversation)
}

/// Save a conversation transcript back to its JSON file.
pub fn save_transcript(
    path: &Path,
    conversation: &Conversation,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(conversation)?;
    std::fs::write(path, json)
        .map_err(|e| format!("Failed to write transcript {}: {e}", path.display()))?;
    Ok(())
}
