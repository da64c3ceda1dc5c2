//! Custom OpenAI-compatible endpoint adapter.
//!
//! Talks the chat-completions shape against a user-supplied base URL. An
//! endpoint ending in `/v1` is treated as an API root and gets
//! `/chat/completions` appended; anything else is called as-is.

use newsdesk_core::pricing::estimate_tokens;
use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;
use tracing::debug;

use crate::adapters::openai::{ChatRequest, build_messages, first_choice_content, read_chat_response};
use crate::error::GenerateError;

/// Model requested when the configuration leaves it empty.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolves the full completions URL from the configured endpoint.
pub(crate) fn completions_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        format!("{trimmed}/chat/completions")
    } else {
        endpoint.to_string()
    }
}

/// Calls a custom OpenAI-compatible endpoint.
pub(crate) async fn complete(
    http: &Client,
    config: &ProviderConfig,
    prompt: &str,
    system_prompt: Option<&str>,
    options: &GenerationOptions,
) -> Result<Completion, GenerateError> {
    let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.is_empty()) else {
        return Err(GenerateError::Configuration(ProviderKind::Custom));
    };
    let url = completions_url(endpoint);
    let model = if config.model.is_empty() {
        DEFAULT_MODEL
    } else {
        &config.model
    };
    debug!(model, url, "Calling custom OpenAI-compatible endpoint");

    let request = ChatRequest {
        model,
        messages: build_messages(prompt, system_prompt),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };
    let response = http
        .post(&url)
        .bearer_auth(config.api_key.as_deref().unwrap_or_default())
        .json(&request)
        .send()
        .await?;

    let parsed = read_chat_response(ProviderKind::Custom, response).await?;
    let (content, usage) = first_choice_content(ProviderKind::Custom, parsed)?;

    // Self-hosted gateways often omit usage.
    let input_tokens = usage
        .as_ref()
        .map(|u| u.prompt_tokens)
        .filter(|&t| t > 0)
        .unwrap_or_else(|| estimate_tokens(prompt));
    let output_tokens = usage
        .as_ref()
        .map(|u| u.completion_tokens)
        .filter(|&t| t > 0)
        .unwrap_or_else(|| estimate_tokens(&content));

    Ok(Completion {
        content,
        model: model.to_string(),
        input_tokens,
        output_tokens,
    })
}

// ============================================================================
// Tests
// ============================================================================
