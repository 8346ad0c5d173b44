//! src/cli.rs
use clap::{Parser, Subcommand};

/// Automate git commits with AI-generated Conventional Commits messages.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage all changes, commit with an AI-generated message, and push.
    #[command(alias = "c")]
    Commit {
        /// Custom commit message (disables AI generation)
        #[arg(short, long)]
        message: Option<String>,

        /// Branch to push to (defaults to the configured branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Commit only, skip the push
        #[arg(short, long)]
        commit_only: bool,

        /// AI provider override (aitunnel, openai or huggingface)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Generate a commit message for pending changes and print it.
    #[command(alias = "m")]
    Message {
        /// Print the bare message only (used by the prepare-commit-msg hook)
        #[arg(long)]
        plain: bool,

        /// AI provider override (aitunnel, openai or huggingface)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Create the configuration file and walk through API token setup.
    Setup,

    /// Install the prepare-commit-msg git hook.
    InstallHook,

    /// Check the current settings and generate a test message.
    Test,
}
