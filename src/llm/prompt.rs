//! src/llm/prompt.rs

/// System half of the two-role prompt sent to chat-completion backends.
pub(super) const SYSTEM_PROMPT: &str = "You are an expert at creating high-quality commit messages in Conventional Commits format. Your messages must be informative, specific, and understandable for both developers and AI systems. Always use the format type(scope): description with specific details of changes.";

/// User half of the two-role prompt, embedding the status and the
/// (possibly truncated) diff.
pub(super) fn chat_user_prompt(diff: &str, status: &str) -> String {
    format!(
        r#"Analyze the git changes and create a brief but informative commit message in Conventional Commits format.

Git Status:
{status}

Git Diff:
{diff}

Message Requirements:
1. Format: type(scope): brief description
2. Type: feat, fix, docs, style, refactor, test, chore
3. Scope: module/component that changed (optional but recommended)
4. Description: what exactly changed and why (max 50 characters)

Good Examples:
- feat(auth): add OAuth2 authentication flow
- fix(api): resolve timeout error in user endpoint
- docs(readme): update installation instructions
- refactor(core): optimize database query performance
- style(ui): improve button spacing and colors

Important:
- Be specific: what changed, not just "update code"
- Use scope for grouping related changes
- Write in English
- Avoid generic phrases like "update", "fix", "change"
- Specify the exact functionality or issue

Return only the commit message, without additional explanations."#
    )
}

const HF_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that specializes in creating conventional commit messages.";

/// Single-string instruct prompt for the Hugging Face text-generation
/// endpoint. Only a short diff excerpt goes in; the full diff would
/// dominate the instruct window.
pub(super) fn huggingface_prompt(diff_excerpt: &str, status: &str) -> String {
    let user_prompt = format!(
        r#"Generate a commit message for the following changes:

Git Status:
{status}

Git Diff (partial):
{diff_excerpt}...

Instructions:
- Create a single-line commit message in format: 'type(scope): message'
- Choose 'type' from: feat, fix, docs, style, refactor, test, chore
- Focus on WHAT changed and WHY
- Keep it under 72 characters
- Be specific and descriptive

Format your response as just the commit message text without explanations.
"#
    );

    format!("<s>[INST] {HF_SYSTEM_PROMPT} [/INST]</s>\n<s>[INST] {user_prompt} [/INST]")
}
