//! `leadline score` — Heuristic lead score for a transcript. Offline.

use std::path::Path;

use leadline_pipeline::calculate_lead_score;

use super::load_transcript;

pub fn run(transcript: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conversation = load_transcript(transcript)?;
    let score = calculate_lead_score(&conversation);

    println!(
        "Lead score for {}: {:.0}%",
        conversation.prospect.first_name,
        score.score * 100.0
    );
    println!("{}\n", score.interpretation);

    if !score.factors.is_empty() {
        println!("Factors:");
        for factor in &score.factors {
            println!("  - {factor}");
        }
    }
    if !score.recommendations.is_empty() {
        println!("Recommendations:");
        for rec in &score.recommendations {
            println!("  - {rec}");
        }
    }

    Ok(())
}
