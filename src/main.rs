//! src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod git;
mod llm;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up tokens from a .env file before anything reads the environment.
    dotenvy::dotenv().ok();

    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Commit {
            message,
            branch,
            commit_only,
            provider,
        } => {
            commands::commit::handle_commit(message, branch, commit_only, provider).await?;
        }
        Commands::Message { plain, provider } => {
            commands::message::handle_message(plain, provider).await?;
        }
        Commands::Setup => {
            commands::setup::handle_setup().await?;
        }
        Commands::InstallHook => {
            commands::install_hook::install_prepare_commit_msg_hook().await?;
        }
        Commands::Test => {
            commands::test::handle_test().await?;
        }
    }

    Ok(())
}
