//! Completion backend: the seam between the orchestrator and the wire.
//!
//! The orchestrator talks to a [`CompletionBackend`] so its routing logic
//! (redirects, fallback, usage accounting) can be tested against a scripted
//! backend without touching the network.

use std::time::Duration;

use async_trait::async_trait;
use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use reqwest::Client;

use crate::adapters;
use crate::error::GenerateError;

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatches one completion call to the provider named in `config`.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Runs one completion against the configured provider.
    async fn complete(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        system_prompt: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<Completion, GenerateError>;
}

/// Production backend dispatching over the provider adapters.
pub struct HttpBackend {
    http: Client,
}

impl HttpBackend {
    /// Creates a backend with the default HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized. This happens at
    /// startup, not per-request, so failing loudly is correct.
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        Self { http }
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(
        &self,
        config: &ProviderConfig,
        prompt: &str,
        system_prompt: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<Completion, GenerateError> {
        match config.kind {
            ProviderKind::OpenAi => {
                adapters::openai::complete(&self.http, config, prompt, system_prompt, options)
                    .await
            }
            ProviderKind::Gemini => {
                adapters::gemini::complete(&self.http, config, prompt, system_prompt, options)
                    .await
            }
            ProviderKind::Backboard => {
                adapters::backboard::complete(&self.http, config, prompt, system_prompt, options)
                    .await
            }
            ProviderKind::Custom => {
                adapters::custom::complete(&self.http, config, prompt, system_prompt, options)
                    .await
            }
            ProviderKind::HuggingFace => {
                adapters::huggingface::complete(&self.http, config, prompt, system_prompt, options)
                    .await
            }
            // Cursor needs a repository to operate on; it cannot serve
            // standalone prompts.
            ProviderKind::Cursor => Err(GenerateError::Unsupported(ProviderKind::Cursor)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cursor_is_not_dispatchable() {
        let backend = HttpBackend::new();
        let config = ProviderConfig {
            kind: ProviderKind::Cursor,
            api_key: None,
            model: "auto".to_string(),
            endpoint: None,
            enabled: true,
            label: "Cursor".to_string(),
        };
        let err = backend
            .complete(&config, "prompt", None, &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Unsupported(ProviderKind::Cursor)));
    }
}
