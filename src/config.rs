//! src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs;

/// Flat application settings, persisted as TOML.
///
/// Every field has a documented default, so a missing file or a partial
/// file always resolves to a usable configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which backend generates messages ("aitunnel", "openai" or "huggingface").
    pub api_provider: String,
    pub aitunnel_token: String,
    pub aitunnel_base_url: String,
    pub aitunnel_model: String,
    pub openai_token: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub huggingface_token: String,
    /// Full model endpoint, not a prefix like the chat providers use.
    pub huggingface_base_url: String,
    /// Branch pushed to when no --branch override is given.
    pub branch: String,
    /// Maximum diff size (in bytes) embedded into the outgoing prompt.
    pub max_diff_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_provider: "aitunnel".to_string(),
            aitunnel_token: String::new(),
            aitunnel_base_url: "https://api.aitunnel.ru/v1/".to_string(),
            aitunnel_model: "gpt-4.1".to_string(),
            openai_token: String::new(),
            openai_base_url: "https://api.openai.com/v1/".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            huggingface_token: String::new(),
            huggingface_base_url:
                "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1"
                    .to_string(),
            branch: "master".to_string(),
            max_diff_size: 7000,
        }
    }
}

/// Overlay the fixed environment-variable subset onto a loaded config.
///
/// Only the aitunnel keys can be overridden this way. Empty values are
/// ignored, so an exported-but-blank variable does not clobber the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(token) = lookup("AI_TUNNEL") {
        config.aitunnel_token = token;
    }
    if let Some(base_url) = lookup("AITUNNEL_BASE_URL") {
        config.aitunnel_base_url = base_url;
    }
    if let Some(model) = lookup("AITUNNEL_MODEL") {
        config.aitunnel_model = model;
    }
}

/// Returns the configuration directory path, creating it if needed.
pub async fn get_config_dir() -> Result<PathBuf> {
    let config_dir = if cfg!(windows) {
        // Windows: %APPDATA%\commitpilot
        dirs::data_dir()
            .map(|p| p.join("commitpilot"))
            .context("Could not get data directory")?
    } else {
        // Linux/macOS: ~/.config/commitpilot
        dirs::config_dir()
            .map(|p| p.join("commitpilot"))
            .context("Could not get config directory")?
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .await
            .context("Could not create config directory")?;
    }
    Ok(config_dir)
}

pub async fn config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir().await?.join("config.toml"))
}

async fn write_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())
        .context("Could not serialize default config")?;
    fs::write(path, content)
        .await
        .context("Could not write config file")?;
    Ok(())
}

/// Creates a default configuration file if one does not exist.
pub async fn create_default_config() -> Result<PathBuf> {
    let config_path = config_file_path().await?;
    if !config_path.exists() {
        write_default_config(&config_path).await?;
        println!("✅ Created configuration file {}", config_path.display());
        println!("⚠️ Add an API token to the config file or .env");
    }
    Ok(config_path)
}

/// File-backed configuration cache keyed by modification time.
///
/// Owned by the command that needs it; nothing here is process-global.
/// `load` hands out the cached value as long as the file's mtime is
/// unchanged, and rereads (recreating a missing file) otherwise.
pub struct ConfigCache {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<Config>)>,
}

impl ConfigCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cached: None }
    }

    pub async fn at_default_location() -> Result<Self> {
        Ok(Self::new(config_file_path().await?))
    }

    pub async fn load(&mut self) -> Result<Arc<Config>> {
        if !self.path.exists() {
            write_default_config(&self.path).await?;
            log::debug!("Created default config at {}", self.path.display());
        }

        let mtime = fs::metadata(&self.path)
            .await
            .context("Could not stat config file")?
            .modified()
            .context("Could not read config file mtime")?;

        if let Some((cached_mtime, config)) = &self.cached {
            if *cached_mtime == mtime {
                return Ok(config.clone());
            }
        }

        let content = fs::read_to_string(&self.path)
            .await
            .context("Could not read config file")?;
        let mut config: Config = toml::from_str(&content).context("Could not parse config file")?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        let config = Arc::new(config);
        self.cached = Some((mtime, config.clone()));
        Ok(config)
    }

    /// Drop the cached value; the next `load` rereads the file.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub async fn reload(&mut self) -> Result<Arc<Config>> {
        self.invalidate();
        self.load().await
    }
}
