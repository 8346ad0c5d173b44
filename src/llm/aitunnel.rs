//! src/llm/aitunnel.rs
use super::{extract_commit_line, prompt, truncate_diff, ProviderClient, FALLBACK_COMMIT_MESSAGE};
use crate::config::Config;
use anyhow::{anyhow, Result};
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// --- Wire structures (OpenAI-compatible chat completions) ---
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// --- Client implementation ---
pub struct AitunnelClient {
    token: String,
    base_url: String,
    model: String,
    max_diff_size: usize,
    client: Client,
}

impl AitunnelClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            token: config.aitunnel_token.clone(),
            base_url: config.aitunnel_base_url.clone(),
            model: config.aitunnel_model.clone(),
            max_diff_size: config.max_diff_size,
            client,
        })
    }

    async fn try_generate(&self, diff: &str, status: &str) -> Result<String> {
        let diff = truncate_diff(diff, self.max_diff_size);
        let user_prompt = prompt::chat_user_prompt(&diff, status);

        let request_payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            max_tokens: 100,
            temperature: 0.3,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request_payload)
            .send()
            .await?;

        let res_status = res.status();
        if !res_status.is_success() {
            let error_body = res.text().await?;
            return Err(anyhow!(
                "AITUNNEL API returned {}:\n{}",
                res_status,
                error_body
            ));
        }

        let response = res.json::<ChatResponse>().await?;
        let message = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("API call succeeded but the 'choices' array is empty"))?;

        Ok(extract_commit_line(&message))
    }
}

#[async_trait::async_trait]
impl ProviderClient for AitunnelClient {
    fn name(&self) -> &'static str {
        "AITUNNEL"
    }

    async fn generate(&self, diff: &str, status: &str) -> String {
        if self.token.is_empty() {
            error!("AITUNNEL API token not configured. Update the config file or .env file.");
            return FALLBACK_COMMIT_MESSAGE.to_string();
        }

        match self.try_generate(diff, status).await {
            Ok(message) => message,
            Err(e) => {
                error!("Error requesting AITUNNEL API: {e:#}");
                FALLBACK_COMMIT_MESSAGE.to_string()
            }
        }
    }
}
