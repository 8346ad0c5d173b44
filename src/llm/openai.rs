//! src/llm/openai.rs
use super::{extract_commit_line, prompt, truncate_diff, ProviderClient, FALLBACK_COMMIT_MESSAGE};
use crate::config::Config;
use anyhow::{anyhow, Result};
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
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

// OpenAI answers fast for 100-token completions; a shorter leash than
// the other backends keeps a dead connection from stalling the commit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenAiClient {
    token: String,
    base_url: String,
    model: String,
    max_diff_size: usize,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            token: config.openai_token.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            max_diff_size: config.max_diff_size,
            client,
        })
    }

    async fn try_generate(&self, diff: &str, status: &str) -> Result<String> {
        let diff = truncate_diff(diff, self.max_diff_size);
        let user_prompt = prompt::chat_user_prompt(&diff, status);

        let request_payload = OpenAiRequest {
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
                "OpenAI API returned {}:\n{}",
                res_status,
                error_body
            ));
        }

        let response = res.json::<OpenAiResponse>().await?;
        let message = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("API call succeeded but the 'choices' array is empty"))?;

        Ok(extract_commit_line(&message))
    }
}

#[async_trait::async_trait]
impl ProviderClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn generate(&self, diff: &str, status: &str) -> String {
        if self.token.is_empty() {
            error!("OpenAI API token not configured. Update the config file.");
            return FALLBACK_COMMIT_MESSAGE.to_string();
        }

        match self.try_generate(diff, status).await {
            Ok(message) => message,
            Err(e) => {
                error!("Error requesting OpenAI API: {e:#}");
                FALLBACK_COMMIT_MESSAGE.to_string()
            }
        }
    }
}
