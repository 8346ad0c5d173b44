//! src/llm/huggingface.rs
use super::{extract_commit_line, prompt, truncate_diff, ProviderClient, FALLBACK_COMMIT_MESSAGE};
use crate::config::Config;
use anyhow::{anyhow, Result};
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// --- Wire structures (text-generation-inference) ---
#[derive(Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Serialize)]
struct HfParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    return_full_text: bool,
}

#[derive(Deserialize, Debug)]
struct HfGeneration {
    #[serde(default)]
    generated_text: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Only this much of the diff goes into the instruct prompt.
const DIFF_EXCERPT_SIZE: usize = 500;

pub struct HuggingFaceClient {
    token: String,
    api_url: String,
    max_diff_size: usize,
    client: Client,
}

impl HuggingFaceClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            token: config.huggingface_token.clone(),
            api_url: config.huggingface_base_url.clone(),
            max_diff_size: config.max_diff_size,
            client,
        })
    }

    async fn try_generate(&self, diff: &str, status: &str) -> Result<String> {
        let diff = truncate_diff(diff, self.max_diff_size);
        let excerpt = clamp_to_boundary(&diff, DIFF_EXCERPT_SIZE);

        let request_payload = HfRequest {
            inputs: prompt::huggingface_prompt(excerpt, status),
            parameters: HfParameters {
                max_new_tokens: 100,
                temperature: 0.2,
                top_p: 0.95,
                return_full_text: false,
            },
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&request_payload)
            .send()
            .await?;

        let res_status = res.status();
        if !res_status.is_success() {
            let error_body = res.text().await?;
            return Err(anyhow!(
                "Hugging Face API returned {} {}\nResponse body: {}",
                res_status,
                res_status.canonical_reason().unwrap_or(""),
                error_body
            ));
        }

        let response = res.json::<Vec<HfGeneration>>().await?;
        let message = response
            .first()
            .map(|generation| generation.generated_text.replace("</s>", "").trim().to_string())
            .ok_or_else(|| anyhow!("Hugging Face API returned an empty generation list"))?;

        Ok(extract_commit_line(&message))
    }
}

fn clamp_to_boundary(text: &str, max_size: usize) -> &str {
    if text.len() <= max_size {
        return text;
    }
    let mut end = max_size;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[async_trait::async_trait]
impl ProviderClient for HuggingFaceClient {
    fn name(&self) -> &'static str {
        "Hugging Face"
    }

    async fn generate(&self, diff: &str, status: &str) -> String {
        if self.token.is_empty() {
            error!("Hugging Face API token not configured. Update the config file.");
            return FALLBACK_COMMIT_MESSAGE.to_string();
        }

        match self.try_generate(diff, status).await {
            Ok(message) => message,
            Err(e) => {
                error!("Error requesting Hugging Face API: {e:#}");
                FALLBACK_COMMIT_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_url: &str, token: &str) -> Config {
        Config {
            huggingface_token: token.to_string(),
            huggingface_base_url: api_url.to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn missing_token_returns_fallback_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let client = HuggingFaceClient::new(&test_config(&server.url(), "")).unwrap();
        let message = client.generate("+line", "M file.txt").await;

        assert_eq!(message, FALLBACK_COMMIT_MESSAGE);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generated_text_is_cleaned_and_normalized() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": "feat(core): add new feature</s>"}]"#)
            .create_async()
            .await;

        let client = HuggingFaceClient::new(&test_config(&server.url(), "hf-test")).unwrap();
        let message = client.generate("+new feature", "M file.txt").await;

        assert_eq!(message, "feat(core): add new feature");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_generation_list_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = HuggingFaceClient::new(&test_config(&server.url(), "hf-test")).unwrap();
        let message = client.generate("+line", "M file.txt").await;

        assert_eq!(message, FALLBACK_COMMIT_MESSAGE);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn network_error_degrades_to_fallback() {
        // Nothing is listening on this port.
        let config = test_config("http://127.0.0.1:9", "hf-test");
        let client = HuggingFaceClient::new(&config).unwrap();

        let message = client.generate("+line", "M file.txt").await;

        assert_eq!(message, FALLBACK_COMMIT_MESSAGE);
    }
}
