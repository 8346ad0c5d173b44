//! src/commands/message.rs

use crate::config::{Config, ConfigCache};
use crate::git;
use crate::llm::{ProviderRegistry, FALLBACK_COMMIT_MESSAGE};
use anyhow::{Context, Result};
use colored::Colorize;

/// Dry run: generate a commit message for pending changes and print it
/// without touching the repository.
pub async fn handle_message(plain: bool, provider: Option<String>) -> Result<()> {
    let mut cache = ConfigCache::at_default_location().await?;
    let config = cache.load().await?;

    let message = generate_message_only(&config, provider.as_deref()).await?;

    if plain {
        // Hook-facing output: the bare message and nothing else.
        println!("{message}");
        return Ok(());
    }

    if message != FALLBACK_COMMIT_MESSAGE {
        println!("Commit: \"{message}\"");
    } else {
        println!(
            "{}",
            "⚠️ Failed to generate a message. Check the API token settings.".yellow()
        );
    }
    Ok(())
}

/// Generate a message for the working tree without performing any other
/// action. Empty status or diff short-circuits to the fallback.
pub(crate) async fn generate_message_only(
    config: &Config,
    provider_override: Option<&str>,
) -> Result<String> {
    let status = git::get_status().await.context("Failed to get git status.")?;
    let diff = git::get_diff().await.context("Failed to get git diff.")?;

    let registry = ProviderRegistry::from_config(config)?;
    let provider = provider_override.unwrap_or(&config.api_provider);
    Ok(registry.select_and_generate(provider, &diff, &status).await)
}
