//! Hugging Face inference API adapter.
//!
//! Works without a credential for many hosted models; a configured key is
//! sent as a bearer token for higher rate limits. The API reports no token
//! usage, so counts are estimated from text length.

use newsdesk_core::pricing::estimate_tokens;
use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerateError;

const HF_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Model requested when the configuration leaves it empty.
const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: String,
}

// ============================================================================
// Adapter
// ============================================================================

/// Calls the Hugging Face inference API.
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
    let url = format!("{HF_API_BASE}/{model}");
    debug!(model, "Calling Hugging Face inference");

    let full_prompt = match system_prompt {
        Some(system) => format!("{system}\n\n{prompt}"),
        None => prompt.to_string(),
    };
    let request = InferenceRequest {
        inputs: &full_prompt,
        parameters: InferenceParameters {
            max_new_tokens: options.max_tokens,
            temperature: options.temperature,
            return_full_text: false,
        },
    };

    let mut builder = http.post(&url).json(&request);
    if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
        builder = builder.bearer_auth(key);
    }
    let response = builder.send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GenerateError::from_response(
            ProviderKind::HuggingFace,
            status.as_u16(),
            &body,
        ));
    }

    let generations: Vec<Generation> =
        serde_json::from_str(&body).map_err(|e| GenerateError::InvalidResponse {
            provider: ProviderKind::HuggingFace,
            message: e.to_string(),
        })?;
    let content = generations
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or(GenerateError::InvalidResponse {
            provider: ProviderKind::HuggingFace,
            message: "response carried no generations".to_string(),
        })?;

    Ok(Completion {
        input_tokens: estimate_tokens(&full_prompt),
        output_tokens: estimate_tokens(&content),
        model: model.to_string(),
        content,
    })
}

// ============================================================================
// Tests
// ============================================================================
