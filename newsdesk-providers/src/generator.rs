//! Generation orchestrator.
//!
//! Routes one generation request to a provider and, when an explicitly
//! requested provider fails retryably, sweeps the fallback chain. Settings
//! are resolved fresh from the store at the start of every call so admin
//! changes apply without a restart.
//!
//! Routing rules:
//! - A provider is usable when it is enabled, or when it was explicitly
//!   requested and has a credential (or is keyless-capable).
//! - An unusable non-default preference redirects to the default provider,
//!   once.
//! - Fallback runs only for an explicit request, only when enabled, and
//!   only for quota or transient failures. Each provider is attempted at
//!   most once per call.
//! - Exactly one usage record is written per successful generation, for
//!   the provider that actually served it.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use newsdesk_core::{GenerationOptions, GenerationResult, ProviderKind, Settings};
use newsdesk_store::{SettingsBlobStore, UsageSink};
use tracing::{debug, error, info, instrument, warn};

use crate::backend::{CompletionBackend, HttpBackend};
use crate::error::{ErrorClass, GenerateError};
use crate::registry;
use crate::tracker::{GENERATE_OPERATION, track_token_usage};

/// Fixed tail of the fallback chain, tried after the configured fallback
/// provider.
const FALLBACK_CANDIDATES: [ProviderKind; 3] = [
    ProviderKind::Backboard,
    ProviderKind::OpenAi,
    ProviderKind::HuggingFace,
];

/// Generation orchestrator.
pub struct Generator<B = HttpBackend> {
    backend: B,
    settings: Arc<dyn SettingsBlobStore>,
    usage: Arc<dyn UsageSink>,
}

impl Generator<HttpBackend> {
    /// Creates an orchestrator over the production HTTP backend.
    pub fn new(settings: Arc<dyn SettingsBlobStore>, usage: Arc<dyn UsageSink>) -> Self {
        Self::with_backend(HttpBackend::new(), settings, usage)
    }
}

impl<B: CompletionBackend> Generator<B> {
    /// Creates an orchestrator over an arbitrary backend.
    pub fn with_backend(
        backend: B,
        settings: Arc<dyn SettingsBlobStore>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        Self {
            backend,
            settings,
            usage,
        }
    }

    /// Returns the backend, mainly so tests can inspect scripted state.
    pub fn backend_ref(&self) -> &B {
        &self.backend
    }

    /// Generates text for `prompt`, routing per the resolved settings.
    ///
    /// # Errors
    ///
    /// Returns the originating provider's error when no provider could
    /// serve the request.
    #[instrument(skip_all, fields(preferred = ?options.preferred_provider))]
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<GenerationResult, GenerateError> {
        let settings = registry::resolve_settings(self.settings.as_ref()).await;
        let mut attempted = HashSet::new();
        self.attempt(
            prompt,
            system_prompt,
            options,
            &settings,
            options.preferred_provider,
            &mut attempted,
        )
        .await
    }

    // Recursive so a fallback attempt reuses the full routing path; boxed
    // because async fns cannot directly recurse.
    fn attempt<'a>(
        &'a self,
        prompt: &'a str,
        system_prompt: Option<&'a str>,
        options: &'a GenerationOptions,
        settings: &'a Settings,
        preferred: Option<ProviderKind>,
        attempted: &'a mut HashSet<ProviderKind>,
    ) -> BoxFuture<'a, Result<GenerationResult, GenerateError>> {
        Box::pin(async move {
            let explicit = preferred.is_some();
            let provider = preferred.unwrap_or(settings.default_provider);

            let config = settings.providers.get(&provider).filter(|c| {
                c.enabled || (explicit && (c.has_credential() || provider.is_keyless_capable()))
            });
            let Some(config) = config else {
                if provider != settings.default_provider {
                    warn!(
                        provider = %provider,
                        default = %settings.default_provider,
                        "Requested provider is not usable, redirecting to default"
                    );
                    return self
                        .attempt(
                            prompt,
                            system_prompt,
                            options,
                            settings,
                            Some(settings.default_provider),
                            &mut *attempted,
                        )
                        .await;
                }
                return Err(GenerateError::Configuration(provider));
            };

            attempted.insert(provider);
            debug!(provider = %provider, model = %config.model, "Dispatching generation");

            let err = match self
                .backend
                .complete(config, prompt, system_prompt, options)
                .await
            {
                Ok(completion) => {
                    let usage = track_token_usage(
                        self.usage.as_ref(),
                        provider,
                        &completion.model,
                        completion.input_tokens,
                        completion.output_tokens,
                        GENERATE_OPERATION,
                        None,
                    )
                    .await;
                    info!(
                        provider = %provider,
                        model = %completion.model,
                        total_tokens = usage.total_tokens,
                        "Generation succeeded"
                    );
                    return Ok(GenerationResult {
                        content: completion.content,
                        provider,
                        model: completion.model,
                        usage,
                    });
                }
                Err(err) => err,
            };

            let class = err.class();
            error!(provider = %provider, class = ?class, error = %err, "Generation failed");

            let retryable = matches!(
                class,
                ErrorClass::QuotaOrRateLimit | ErrorClass::Transient
            );
            if retryable && explicit && settings.enable_fallback {
                let mut candidates = vec![settings.fallback_provider];
                candidates.extend(
                    FALLBACK_CANDIDATES
                        .iter()
                        .copied()
                        .filter(|&c| c != settings.fallback_provider),
                );

                for candidate in candidates {
                    if attempted.contains(&candidate) {
                        continue;
                    }
                    let Some(candidate_config) = settings.providers.get(&candidate) else {
                        continue;
                    };
                    if !candidate_config.enabled
                        || !(candidate_config.has_credential()
                            || candidate.is_keyless_capable())
                    {
                        debug!(candidate = %candidate, "Fallback candidate is not usable, skipping");
                        continue;
                    }

                    info!(candidate = %candidate, "Trying fallback provider");
                    match self
                        .attempt(
                            prompt,
                            system_prompt,
                            options,
                            settings,
                            Some(candidate),
                            &mut *attempted,
                        )
                        .await
                    {
                        Ok(result) => return Ok(result),
                        Err(fallback_err) => {
                            warn!(
                                candidate = %candidate,
                                error = %fallback_err,
                                "Fallback provider failed"
                            );
                        }
                    }
                }
                error!(provider = %provider, "Every fallback candidate failed or was unusable");
            }

            Err(err)
        })
    }
}
