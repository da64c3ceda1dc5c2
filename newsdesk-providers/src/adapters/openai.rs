//! OpenAI chat-completions adapter and the shared chat wire types.

use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerateError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model requested when the configuration leaves it empty.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

// ============================================================================
// Wire Types (shared with Backboard and custom endpoints)
// ============================================================================

/// One chat message.
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Chat-completions response body. Fields default so partial or
/// usage-free responses still parse.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatTurn,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatTurn {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Builds the message list: optional system turn, then the user prompt.
pub(crate) fn build_messages<'a>(
    prompt: &'a str,
    system_prompt: Option<&'a str>,
) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

/// Reads a chat-completions response body, surfacing non-2xx statuses as
/// structured provider errors.
pub(crate) async fn read_chat_response(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<ChatResponse, GenerateError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GenerateError::from_response(provider, status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| GenerateError::InvalidResponse {
        provider,
        message: e.to_string(),
    })
}

/// Extracts the first choice's content, or fails when there is none.
pub(crate) fn first_choice_content(
    provider: ProviderKind,
    response: ChatResponse,
) -> Result<(String, Option<ChatUsage>), GenerateError> {
    let usage = response.usage;
    let content = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(GenerateError::InvalidResponse {
            provider,
            message: "response carried no choices".to_string(),
        })?;
    Ok((content, usage))
}

// ============================================================================
// Adapter
// ============================================================================

/// Calls the OpenAI chat completions API.
pub(crate) async fn complete(
    http: &Client,
    config: &ProviderConfig,
    prompt: &str,
    system_prompt: Option<&str>,
    options: &GenerationOptions,
) -> Result<Completion, GenerateError> {
    let model = if config.model.is_empty() {
        DEFAULT_MODEL
    } else {
        &config.model
    };
    debug!(model, "Calling OpenAI chat completions");

    let request = ChatRequest {
        model,
        messages: build_messages(prompt, system_prompt),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };
    let response = http
        .post(OPENAI_CHAT_URL)
        .bearer_auth(config.api_key.as_deref().unwrap_or_default())
        .json(&request)
        .send()
        .await?;

    let parsed = read_chat_response(ProviderKind::OpenAi, response).await?;
    let (content, usage) = first_choice_content(ProviderKind::OpenAi, parsed)?;
    let usage = usage.unwrap_or_default();

    Ok(Completion {
        content,
        model: model.to_string(),
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    })
}

// ============================================================================
// Tests
// ============================================================================
