//! `leadline sweep` — Mark stale transcripts in a directory as cold. Offline.

use std::path::Path;

use chrono::Utc;
use leadline_config::AppConfig;
use leadline_pipeline::sweep_cold;

use super::{load_transcript, save_transcript};

pub fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    if !config.conversation.cold_lead_sweep_enabled {
        println!("Cold-lead sweep is disabled; enable conversation.cold_lead_sweep_enabled");
        return Ok(());
    }

    let mut swept = 0;
    let mut scanned = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        scanned += 1;
        let mut conversations = vec![load_transcript(&path)?];
        let marked = sweep_cold(
            &mut conversations,
            config.conversation.cold_lead_threshold_days as i64,
            true,
            Utc::now(),
        );
        if !marked.is_empty() {
            save_transcript(&path, &conversations[0])?;
            println!("Marked cold: {} ({})", conversations[0].id, path.display());
            swept += 1;
        }
    }

    println!("Scanned {scanned} transcript(s), marked {swept} cold.");
    Ok(())
}
