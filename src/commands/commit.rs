use crate::config::ConfigCache;
use crate::git;
use crate::llm::ProviderRegistry;
use anyhow::{bail, Context, Result};
use colored::Colorize;

/// The full pipeline: stage → diff → message → commit → push.
pub async fn handle_commit(
    message: Option<String>,
    branch: Option<String>,
    commit_only: bool,
    provider: Option<String>,
) -> Result<()> {
    if !git::check_is_git_repo().await {
        bail!("The current directory is not a git repository.");
    }

    let mut cache = ConfigCache::at_default_location().await?;
    let config = cache.load().await?;

    let status = git::get_status().await.context("Failed to get git status.")?;
    if status.is_empty() {
        println!("{}", "ℹ️ No changes to commit".yellow());
        return Ok(());
    }

    git::stage_all().await.context("Failed to stage changes.")?;
    let diff = git::get_diff().await.context("Failed to get git diff.")?;

    let commit_message = match message {
        Some(custom) => custom,
        None => {
            let registry = ProviderRegistry::from_config(&config)?;
            let provider = provider.as_deref().unwrap_or(&config.api_provider);
            registry.select_and_generate(provider, &diff, &status).await
        }
    };

    println!("📝 {}", commit_message.cyan());
    git::commit(&commit_message)
        .await
        .context("Failed to execute git commit.")?;
    println!("{}", "🚀 Commit created.".green());

    if !commit_only {
        let branch = branch.unwrap_or_else(|| config.branch.clone());
        git::push(&branch)
            .await
            .with_context(|| format!("Failed to push changes to branch {branch}."))?;
        println!("✅ Changes pushed to branch {}", branch.green());
    }

    Ok(())
}
