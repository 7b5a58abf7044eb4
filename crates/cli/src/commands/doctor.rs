//! `leadline doctor` — Diagnose config and provider health.

use leadline_config::AppConfig;
use leadline_providers::build_adapter;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Leadline Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = match AppConfig::load() {
        Ok(config) => {
            if config_path.exists() {
                println!("  ✅ Config file valid");
            } else {
                println!("  ⚠️  No config file — using defaults (run `leadline onboard`)");
            }
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = config {
        if config.has_api_key() {
            println!("  ✅ API key configured");
        } else {
            println!("  ⚠️  No API key — set XAI_API_KEY or OPENAI_API_KEY");
            issues += 1;
        }

        println!(
            "  ℹ️  Providers: {} (primary), {} (fallback)",
            config.primary_provider, config.fallback_provider
        );

        // Check provider reachability
        match build_adapter(&config) {
            Ok(adapter) => {
                if adapter.health_check().await {
                    println!("  ✅ Provider reachable");
                } else {
                    println!("  ❌ No provider responded to health check");
                    issues += 1;
                }
            }
            Err(e) => {
                println!("  ❌ Could not build provider adapter: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
