//! src/llm/mod.rs

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;

pub mod aitunnel;
pub mod huggingface;
pub mod openai;
mod prompt;

pub use aitunnel::AitunnelClient;
pub use huggingface::HuggingFaceClient;
pub use openai::OpenAiClient;

/// Message used whenever generation cannot be completed.
pub const FALLBACK_COMMIT_MESSAGE: &str = "chore: automatic changes commit";

/// Conventional Commits type prefixes recognized by the normalizer.
pub const COMMIT_PREFIXES: [&str; 7] = [
    "feat", "fix", "docs", "style", "refactor", "test", "chore",
];

/// One configured AI backend able to describe pending changes.
///
/// `generate` is infallible by contract: adapters catch every failure
/// (missing token, timeout, HTTP error, malformed payload), log it, and
/// degrade to [`FALLBACK_COMMIT_MESSAGE`].
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Display name of the backend.
    fn name(&self) -> &'static str;
    /// Turn a diff and a porcelain status into a commit message.
    async fn generate(&self, diff: &str, status: &str) -> String;
}

/// Extract a single commit-message line from raw model output.
///
/// First line starting with a Conventional Commits prefix wins; failing
/// that, the first non-empty line that is not a code fence; failing
/// that, the whole trimmed text. Always returns a string, possibly
/// empty.
pub fn extract_commit_line(raw: &str) -> String {
    for line in raw.lines() {
        let line = line.trim();
        if COMMIT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            return line.to_string();
        }
    }

    for line in raw.lines() {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with("```") {
            return line.to_string();
        }
    }

    raw.trim().to_string()
}

/// Cut `diff` down to at most `max_size` bytes, appending a marker when
/// it does. The cut snaps back to a char boundary, so a multi-byte
/// character at the limit is dropped rather than split.
pub(crate) fn truncate_diff(diff: &str, max_size: usize) -> String {
    if diff.len() <= max_size {
        return diff.to_string();
    }
    let mut end = max_size;
    while !diff.is_char_boundary(end) {
        end -= 1;
    }
    debug!("Diff size exceeds limit. Truncated to {end} bytes.");
    format!("{}\n... (truncated)", &diff[..end])
}

/// The dispatcher: a capability registry mapping provider names to the
/// adapters available in this process, plus a designated always-present
/// fallback adapter.
///
/// Each call is single-shot and stateless; the host populates the
/// registry once at startup.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ProviderClient>>,
    fallback: Arc<dyn ProviderClient>,
}

impl ProviderRegistry {
    pub fn new(fallback: Arc<dyn ProviderClient>) -> Self {
        Self {
            providers: HashMap::new(),
            fallback,
        }
    }

    /// Build the standard registry: all three adapters, with the
    /// Hugging Face adapter doubling as the fallback.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fallback: Arc<dyn ProviderClient> = Arc::new(HuggingFaceClient::new(config)?);
        let mut registry = Self::new(fallback.clone());
        registry.register("huggingface", fallback);
        registry.register("aitunnel", Arc::new(AitunnelClient::new(config)?));
        registry.register("openai", Arc::new(OpenAiClient::new(config)?));
        Ok(registry)
    }

    pub fn register(&mut self, name: &str, client: Arc<dyn ProviderClient>) {
        self.providers.insert(name.to_lowercase(), client);
    }

    /// Case-insensitive lookup; unknown names warn and yield the
    /// fallback adapter.
    pub fn resolve(&self, name: &str) -> &Arc<dyn ProviderClient> {
        match self.providers.get(&name.to_lowercase()) {
            Some(client) => client,
            None => {
                warn!(
                    "Provider {name:?} selected but not available. Using {}.",
                    self.fallback.name()
                );
                &self.fallback
            }
        }
    }

    /// Select the configured adapter and generate a message.
    ///
    /// An empty diff or status means there is nothing to describe, so
    /// no adapter is invoked at all.
    pub async fn select_and_generate(&self, provider: &str, diff: &str, status: &str) -> String {
        if status.is_empty() {
            warn!("No changes to analyze");
            return FALLBACK_COMMIT_MESSAGE.to_string();
        }
        if diff.is_empty() {
            warn!("Empty diff, nothing to analyze");
            return FALLBACK_COMMIT_MESSAGE.to_string();
        }

        let client = self.resolve(provider);
        debug!("Using AI provider: {}", client.name());
        client.generate(diff, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubClient {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderClient for StubClient {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn generate(&self, _diff: &str, _status: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.to_string()
        }
    }

    // --- extract_commit_line ---

    #[test]
    fn prefix_line_wins_over_earlier_noise() {
        let raw = "\nHere is a suggestion:\n```\nfeat(core): add new feature\n```\n";
        assert_eq!(extract_commit_line(raw), "feat(core): add new feature");
    }

    #[test]
    fn first_prefix_line_wins_in_order() {
        let raw = "fix(api): resolve timeout\nfeat(ui): add button";
        assert_eq!(extract_commit_line(raw), "fix(api): resolve timeout");
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let raw = "   chore(deps): bump serde   ";
        assert_eq!(extract_commit_line(raw), "chore(deps): bump serde");
    }

    #[test]
    fn falls_back_to_first_non_fence_line() {
        let raw = "```\nSome explanation of the change\nmore text";
        assert_eq!(extract_commit_line(raw), "Some explanation of the change");
    }

    #[test]
    fn whitespace_only_input_yields_empty_string() {
        assert_eq!(extract_commit_line("  \n\t\n"), "");
        assert_eq!(extract_commit_line(""), "");
    }

    #[test]
    fn fence_only_input_yields_trimmed_text() {
        assert_eq!(extract_commit_line("```\n```"), "```\n```");
    }

    // --- truncate_diff ---

    #[test]
    fn short_diff_passes_through() {
        assert_eq!(truncate_diff("+short", 100), "+short");
    }

    #[test]
    fn long_diff_is_cut_with_marker() {
        let diff = "a".repeat(50);
        let truncated = truncate_diff(&diff, 10);
        assert_eq!(truncated, format!("{}\n... (truncated)", "a".repeat(10)));
        assert!(!truncated.contains(&"a".repeat(11)));
    }

    #[test]
    fn cut_snaps_to_char_boundary() {
        // Each 'é' is two bytes; a limit of 3 lands mid-char.
        let truncated = truncate_diff("ééé", 3);
        assert_eq!(truncated, "é\n... (truncated)");
    }

    // --- dispatcher ---

    #[tokio::test]
    async fn empty_status_short_circuits_without_invoking_adapters() {
        let fallback = StubClient::new("unused");
        let aitunnel = StubClient::new("feat: stubbed");
        let mut registry = ProviderRegistry::new(fallback.clone());
        registry.register("aitunnel", aitunnel.clone());

        let message = registry.select_and_generate("aitunnel", "+line", "").await;

        assert_eq!(message, FALLBACK_COMMIT_MESSAGE);
        assert_eq!(aitunnel.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn empty_diff_short_circuits_without_invoking_adapters() {
        let fallback = StubClient::new("unused");
        let mut registry = ProviderRegistry::new(fallback.clone());
        registry.register("aitunnel", fallback.clone());

        let message = registry.select_and_generate("aitunnel", "", "M file.txt").await;

        assert_eq!(message, FALLBACK_COMMIT_MESSAGE);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn unavailable_provider_delegates_to_fallback_adapter() {
        let fallback = StubClient::new("chore(hf): fallback generated");
        let registry = ProviderRegistry::new(fallback.clone());

        let message = registry
            .select_and_generate("openai", "+line", "M file.txt")
            .await;

        assert_eq!(message, "chore(hf): fallback generated");
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn provider_names_resolve_case_insensitively() {
        let fallback = StubClient::new("unused");
        let openai = StubClient::new("feat: from openai");
        let mut registry = ProviderRegistry::new(fallback.clone());
        registry.register("openai", openai.clone());

        let message = registry
            .select_and_generate("OpenAI", "+line", "M file.txt")
            .await;

        assert_eq!(message, "feat: from openai");
        assert_eq!(openai.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn adapter_reply_is_returned_verbatim() {
        let fallback = StubClient::new("unused");
        let aitunnel = StubClient::new("feat(core): add new feature");
        let mut registry = ProviderRegistry::new(fallback);
        registry.register("aitunnel", aitunnel);

        let message = registry
            .select_and_generate("aitunnel", "+new feature", "M file.txt")
            .await;

        assert_eq!(message, "feat(core): add new feature");
    }
}
