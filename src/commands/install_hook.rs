//! src/commands/install_hook.rs

use crate::git::run_git_command;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, PartialEq)]
pub enum HookStatus {
    NotInstalled,
    InstalledByUs,
    InstalledByOther,
}

const HOOK_MARKER: &str = "commitpilot message --plain";

const HOOK_CONTENT: &str = r#"#!/bin/sh
# Prepare-commit-msg hook for commitpilot
# Pre-fills the commit message with an AI-generated suggestion.

COMMIT_MSG_FILE="$1"
COMMIT_SOURCE="$2"

# Only when no message was given (-m, merge, amend all set a source).
if [ -z "$COMMIT_SOURCE" ]; then
    MESSAGE=$(commitpilot message --plain 2>/dev/null)
    if [ -n "$MESSAGE" ]; then
        printf '%s\n' "$MESSAGE" > "$COMMIT_MSG_FILE"
    fi
fi
"#;

async fn get_hook_path() -> Result<PathBuf> {
    let git_dir_output = run_git_command(&["rev-parse", "--git-dir"]).await?;
    let git_dir_path = PathBuf::from(git_dir_output.trim());
    Ok(git_dir_path.join("hooks").join("prepare-commit-msg"))
}

pub async fn check_hook_status() -> Result<HookStatus> {
    let hook_path = get_hook_path().await?;
    if !hook_path.exists() {
        return Ok(HookStatus::NotInstalled);
    }

    let content = fs::read_to_string(&hook_path).await?;
    if content.contains(HOOK_MARKER) {
        Ok(HookStatus::InstalledByUs)
    } else {
        Ok(HookStatus::InstalledByOther)
    }
}

pub async fn install_prepare_commit_msg_hook() -> Result<()> {
    let hook_path = get_hook_path().await?;
    let hooks_dir = hook_path
        .parent()
        .context("Failed to get hooks directory from path")?;

    if !hooks_dir.exists() {
        fs::create_dir_all(hooks_dir)
            .await
            .context("Failed to create hooks directory")?;
    }

    if hook_path.exists() {
        let existing_content = fs::read_to_string(&hook_path).await?;

        if existing_content.contains(HOOK_MARKER) {
            println!("✅ The prepare-commit-msg hook is already installed.");
            return Ok(());
        }

        // A foreign hook exists; append rather than clobber it.
        let mut new_content = existing_content;
        if !new_content.ends_with('\n') {
            new_content.push('\n');
        }
        new_content.push_str(concat!(
            "\n# Added by commitpilot\n",
            "if [ -z \"$2\" ]; then\n",
            "    MESSAGE=$(commitpilot message --plain 2>/dev/null)\n",
            "    [ -n \"$MESSAGE\" ] && printf '%s\\n' \"$MESSAGE\" > \"$1\"\n",
            "fi\n",
        ));
        fs::write(&hook_path, new_content)
            .await
            .context("Failed to append to prepare-commit-msg hook")?;
        println!("✅ Added commitpilot to the existing prepare-commit-msg hook.");
        return Ok(());
    }

    let hook_script = HOOK_CONTENT.replace("\r\n", "\n");
    fs::write(&hook_path, hook_script)
        .await
        .context("Failed to write prepare-commit-msg hook")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path).await?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms)
            .await
            .context("Failed to set hook permissions")?;
    }

    println!("✅ Git hook installed: {}", hook_path.display());
    Ok(())
}
