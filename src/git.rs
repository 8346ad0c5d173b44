//! src/git.rs

use anyhow::{anyhow, Context, Result};
use std::process::Stdio;
use tokio::process::Command;

pub async fn run_git_command(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .context("Failed to execute git command")?;

    if output.status.success() {
        Ok(String::from_utf8(output.stdout).context("Failed to parse git command output")?)
    } else {
        let stderr = String::from_utf8(output.stderr)
            .unwrap_or_else(|_| "Could not read stderr".to_string());
        Err(anyhow!(
            "Git command failed with status {}:\n{}",
            output.status,
            stderr
        ))
    }
}

pub async fn check_is_git_repo() -> bool {
    run_git_command(&["rev-parse", "--git-dir"]).await.is_ok()
}

pub async fn get_staged_diff() -> Result<String> {
    Ok(run_git_command(&["diff", "--cached"]).await?.trim().to_string())
}

/// Pending changes: the staged diff, falling back to the unstaged diff
/// when nothing is staged yet.
pub async fn get_diff() -> Result<String> {
    let staged = get_staged_diff().await?;
    if !staged.is_empty() {
        return Ok(staged);
    }
    Ok(run_git_command(&["diff"]).await?.trim().to_string())
}

pub async fn get_status() -> Result<String> {
    Ok(run_git_command(&["status", "--porcelain"])
        .await?
        .trim()
        .to_string())
}

pub async fn stage_all() -> Result<()> {
    run_git_command(&["add", "."]).await?;
    Ok(())
}

pub async fn commit(message: &str) -> Result<()> {
    run_git_command(&["commit", "-m", message]).await?;
    Ok(())
}

pub async fn push(branch: &str) -> Result<()> {
    run_git_command(&["push", "origin", branch]).await?;
    Ok(())
}
