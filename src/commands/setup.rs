//! src/commands/setup.rs

use crate::commands::{install_hook, test};
use crate::config::{self, ConfigCache};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};

pub async fn handle_setup() -> Result<()> {
    let config_path = config::create_default_config().await?;

    println!("✅ Configuration file: {}", config_path.display());
    println!("📝 Edit it and add your API token, or create a .env file in the project root:");
    println!("   AI_TUNNEL=sk-aitunnel-your_token");
    println!("   Get an AITUNNEL token: https://aitunnel.ru/");
    println!("   Get a Hugging Face token: https://huggingface.co/settings/tokens");
    println!("   Get an OpenAI token: https://platform.openai.com/api-keys");

    let hook_status = install_hook::check_hook_status()
        .await
        .unwrap_or(install_hook::HookStatus::NotInstalled);
    if hook_status != install_hook::HookStatus::InstalledByUs {
        // Treat a non-interactive session as "no".
        let install = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Install the git hook for automatic commit messages?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if install {
            if let Err(e) = install_hook::install_prepare_commit_msg_hook().await {
                println!("❌ Error installing the git hook: {e:#}");
            }
        }
    }

    println!("\n🧪 Testing commitpilot...");
    // Reread the file fresh in case the user edited it mid-setup.
    let mut cache = ConfigCache::new(config_path);
    let settings = cache.reload().await?;
    if let Err(e) = test::run_settings_test(&settings).await {
        println!("⚠️ Check error: {e:#}");
    }

    println!("✅ Setup completed");
    Ok(())
}
