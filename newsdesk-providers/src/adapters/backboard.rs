//! Backboard.io adapter.
//!
//! Backboard is an aggregator speaking the chat-completions shape. It does
//! not serve Gemini models, so those get substituted with `gpt-3.5-turbo`
//! before the call; billing follows the substituted model. Usage is not
//! always reported, in which case token counts are estimated from text
//! length.

use newsdesk_core::pricing::estimate_tokens;
use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;
use tracing::{debug, warn};

use crate::adapters::openai::{ChatRequest, build_messages, first_choice_content, read_chat_response};
use crate::error::GenerateError;

/// Default Backboard API root.
pub(crate) const DEFAULT_ENDPOINT: &str = "https://app.backboard.io/api";

/// Model requested when the configuration leaves it empty, and the
/// substitute for models Backboard cannot serve.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Maps the configured model to one Backboard can serve.
pub(crate) fn effective_model(model: &str) -> &str {
    if model.is_empty() {
        return DEFAULT_MODEL;
    }
    if model.to_ascii_lowercase().contains("gemini") {
        warn!(requested = model, substitute = DEFAULT_MODEL, "Backboard cannot serve Gemini models, substituting");
        return DEFAULT_MODEL;
    }
    model
}

/// Calls the Backboard chat completions API.
pub(crate) async fn complete(
    http: &Client,
    config: &ProviderConfig,
    prompt: &str,
    system_prompt: Option<&str>,
    options: &GenerationOptions,
) -> Result<Completion, GenerateError> {
    let endpoint = config
        .endpoint
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT);
    let url = format!("{}/chat/completions", endpoint.trim_end_matches('/'));
    let model = effective_model(&config.model);
    debug!(model, url, "Calling Backboard chat completions");

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

    let parsed = read_chat_response(ProviderKind::Backboard, response).await?;
    let (content, usage) = first_choice_content(ProviderKind::Backboard, parsed)?;

    // Reported-but-zero counts are treated as unreported.
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
