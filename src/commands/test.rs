use crate::commands::message::generate_message_only;
use crate::config::{Config, ConfigCache};
use crate::llm::FALLBACK_COMMIT_MESSAGE;
use anyhow::Result;

/// Self-test: report the active settings, then try to generate a real
/// message with them.
pub async fn handle_test() -> Result<()> {
    println!("🧪 Testing commitpilot settings...");

    let mut cache = ConfigCache::at_default_location().await?;
    let config = cache.load().await?;
    run_settings_test(&config).await?;

    println!("\n✅ Test completed");
    Ok(())
}

pub(crate) async fn run_settings_test(config: &Config) -> Result<()> {
    let provider = config.api_provider.to_lowercase();
    let (token, display_name) = match provider.as_str() {
        "aitunnel" => (config.aitunnel_token.as_str(), "AITUNNEL"),
        "openai" => (config.openai_token.as_str(), "OpenAI"),
        "huggingface" => (config.huggingface_token.as_str(), "Hugging Face"),
        other => ("", other),
    };

    if token.is_empty() {
        println!("❌ Token not configured: {display_name}");
    } else {
        println!("✅ Token configured: {display_name}");
    }
    println!("✅ Provider: {}", config.api_provider);
    println!("✅ Default branch: {}", config.branch);

    println!("\n🧪 Generating a test message...");
    let test_message = generate_message_only(config, None).await?;
    if test_message != FALLBACK_COMMIT_MESSAGE {
        println!("✅ Test message: \"{test_message}\"");
    } else {
        println!("❌ Failed to generate a test message");
    }

    Ok(())
}
