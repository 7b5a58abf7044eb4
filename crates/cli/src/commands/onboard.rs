//! `leadline onboard` — First-time setup.

use leadline_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🥊 Leadline — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file exists: {}", config_path.display());
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created starter config: {}", config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Set XAI_API_KEY and OPENAI_API_KEY in your environment,");
    println!("     or add api_key entries under [providers.grok] and");
    println!("     [providers.openai] in config.toml");
    println!("  2. Run `leadline doctor` to verify provider connectivity");

    Ok(())
}
