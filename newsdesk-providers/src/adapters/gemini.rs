//! Google Gemini adapter.
//!
//! Gemini has no separate system role in this API shape, so the system
//! prompt is prepended to the user prompt with a blank line between.

use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerateError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model requested when the configuration leaves it empty.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
}

// ============================================================================
// Adapter
// ============================================================================

/// Calls the Gemini `generateContent` API.
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
    let api_key = config.api_key.as_deref().unwrap_or_default();
    let url = format!("{GEMINI_API_BASE}/{model}:generateContent?key={api_key}");
    debug!(model, "Calling Gemini generateContent");

    let full_prompt = match system_prompt {
        Some(system) => format!("{system}\n\n{prompt}"),
        None => prompt.to_string(),
    };
    let request = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: full_prompt }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: options.max_tokens,
            temperature: options.temperature,
        },
    };

    let response = http.post(&url).json(&request).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GenerateError::from_response(
            ProviderKind::Gemini,
            status.as_u16(),
            &body,
        ));
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(&body).map_err(|e| GenerateError::InvalidResponse {
            provider: ProviderKind::Gemini,
            message: e.to_string(),
        })?;

    let content = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or(GenerateError::InvalidResponse {
            provider: ProviderKind::Gemini,
            message: "response carried no candidates".to_string(),
        })?;

    let usage = parsed.usage_metadata.unwrap_or_default();
    Ok(Completion {
        content,
        model: model.to_string(),
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_with_usage_metadata() {
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "generated"}]}}],
            "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 40}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let usage = parsed.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 20);
        assert_eq!(usage.candidates_token_count, 40);
        assert_eq!(parsed.candidates[0].content.as_ref().unwrap().parts[0].text, "generated");
    }

    #[test]
    fn test_response_without_usage_defaults_to_zero() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "x"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.usage_metadata.is_none());
    }

    #[test]
    fn test_request_serializes_camel_case_config() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi".to_string() }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 2000,
                temperature: 0.7,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["generationConfig"]["maxOutputTokens"].is_number());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
