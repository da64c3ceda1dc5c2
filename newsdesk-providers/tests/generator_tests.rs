//! Orchestrator routing tests against a scripted backend.
//!
//! These exercise the routing rules end to end: redirects, the fallback
//! sweep, at-most-once attempts, and usage accounting, with no network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use newsdesk_core::{Completion, GenerationOptions, ProviderConfig, ProviderKind};
use newsdesk_providers::{
    AI_SETTINGS_KEY, CompletionBackend, GenerateError, Generator,
};
use newsdesk_store::{
    MemorySettingsStore, MemoryUsageSink, SettingsBlobStore, StoreError,
};

// ============================================================================
// Scripted Backend
// ============================================================================

/// Backend returning pre-scripted responses per provider, in order.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<HashMap<ProviderKind, VecDeque<Result<Completion, GenerateError>>>>,
    calls: Mutex<Vec<ProviderKind>>,
}

impl ScriptedBackend {
    fn script(self, kind: ProviderKind, response: Result<Completion, GenerateError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(response);
        self
    }

    fn calls(&self) -> Vec<ProviderKind> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        config: &ProviderConfig,
        _prompt: &str,
        _system_prompt: Option<&str>,
        _options: &GenerationOptions,
    ) -> Result<Completion, GenerateError> {
        self.calls.lock().unwrap().push(config.kind);
        self.responses
            .lock()
            .unwrap()
            .get_mut(&config.kind)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unscripted call to {}", config.kind))
    }
}

fn completion(model: &str) -> Completion {
    Completion {
        content: "generated text".to_string(),
        model: model.to_string(),
        input_tokens: 100,
        output_tokens: 200,
    }
}

fn quota_error(provider: ProviderKind) -> GenerateError {
    GenerateError::from_response(provider, 429, "rate limit exceeded")
}

/// Settings store that always fails, for the degrade-to-defaults path.
struct OfflineSettingsStore;

#[async_trait]
impl SettingsBlobStore for OfflineSettingsStore {
    async fn get_blob(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("settings db offline".to_string()))
    }

    async fn put_blob(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("settings db offline".to_string()))
    }
}

fn store_with(blob: &str) -> Arc<MemorySettingsStore> {
    Arc::new(MemorySettingsStore::with_blob(AI_SETTINGS_KEY, blob))
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn unusable_preference_redirects_to_default_and_bills_it() {
    // OpenAI has no credential and is disabled; Gemini is credentialed.
    let store = store_with(r#"{"providers": {"gemini": {"api_key": "AIza-x"}}}"#);
    let sink = Arc::new(MemoryUsageSink::new());
    let backend =
        ScriptedBackend::default().script(ProviderKind::Gemini, Ok(completion("gemini-2.5-flash")));

    let generator = Generator::with_backend(backend, store, sink.clone());
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::OpenAi);
    let result = generator.generate("prompt", None, &options).await.unwrap();

    assert_eq!(result.provider, ProviderKind::Gemini);
    assert_eq!(result.model, "gemini-2.5-flash");

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].provider, ProviderKind::Gemini);
}

#[tokio::test]
async fn explicit_credentialed_but_disabled_provider_is_used() {
    // OpenAI is credentialed but not enabled; an explicit request still
    // reaches it.
    let store = store_with(
        r#"{"providers": {"openai": {"api_key": "sk-x", "enabled": false}, "gemini": {"api_key": "AIza-x"}}}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend =
        ScriptedBackend::default().script(ProviderKind::OpenAi, Ok(completion("gpt-3.5-turbo")));

    let generator = Generator::with_backend(backend, store, sink);
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::OpenAi);
    let result = generator.generate("prompt", None, &options).await.unwrap();

    assert_eq!(result.provider, ProviderKind::OpenAi);
}

#[tokio::test]
async fn explicit_keyless_provider_is_used_without_credential() {
    let store = Arc::new(MemorySettingsStore::new());
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::HuggingFace, Ok(completion("facebook/bart-large-cnn")));

    let generator = Generator::with_backend(backend, store, sink);
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::HuggingFace);
    let result = generator.generate("prompt", None, &options).await.unwrap();

    assert_eq!(result.provider, ProviderKind::HuggingFace);
}

#[tokio::test]
async fn nothing_usable_is_a_configuration_error() {
    // Defaults only: Gemini (default) has no credential and is disabled.
    let store = Arc::new(MemorySettingsStore::new());
    let sink = Arc::new(MemoryUsageSink::new());
    let generator = Generator::with_backend(ScriptedBackend::default(), store, sink.clone());

    let err = generator
        .generate("prompt", None, &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Configuration(ProviderKind::Gemini)));
    assert!(sink.records().await.is_empty());
}

#[tokio::test]
async fn settings_store_outage_degrades_to_defaults() {
    let sink = Arc::new(MemoryUsageSink::new());
    let generator = Generator::with_backend(
        ScriptedBackend::default(),
        Arc::new(OfflineSettingsStore),
        sink,
    );

    // Defaults: Gemini is the default provider and is not usable.
    let err = generator
        .generate("prompt", None, &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Configuration(ProviderKind::Gemini)));
}

// ============================================================================
// Fallback
// ============================================================================

#[tokio::test]
async fn quota_failure_sweeps_to_fallback_provider() {
    let store = store_with(
        r#"{"providers": {"gemini": {"api_key": "AIza-x"}, "backboard": {"api_key": "bb-x"}}}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::Gemini, Err(quota_error(ProviderKind::Gemini)))
        .script(ProviderKind::Backboard, Ok(completion("gpt-3.5-turbo")));

    let generator = Generator::with_backend(backend, store, sink.clone());
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::Gemini);
    let result = generator.generate("prompt", None, &options).await.unwrap();

    assert_eq!(result.provider, ProviderKind::Backboard);
    assert_eq!(result.model, "gpt-3.5-turbo");

    // The failed provider is attempted exactly once and never billed.
    assert_eq!(generator_calls(&generator), vec![ProviderKind::Gemini, ProviderKind::Backboard]);
    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].provider, ProviderKind::Backboard);
}

#[tokio::test]
async fn fallback_walks_the_chain_past_failing_candidates() {
    let store = store_with(
        r#"{"providers": {
            "gemini": {"api_key": "AIza-x"},
            "backboard": {"api_key": "bb-x"},
            "openai": {"api_key": "sk-x", "enabled": true}
        }}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::Gemini, Err(quota_error(ProviderKind::Gemini)))
        .script(
            ProviderKind::Backboard,
            Err(GenerateError::from_response(ProviderKind::Backboard, 503, "overloaded")),
        )
        .script(ProviderKind::OpenAi, Ok(completion("gpt-3.5-turbo")));

    let generator = Generator::with_backend(backend, store, sink.clone());
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::Gemini);
    let result = generator.generate("prompt", None, &options).await.unwrap();

    assert_eq!(result.provider, ProviderKind::OpenAi);
    assert_eq!(
        generator_calls(&generator),
        vec![ProviderKind::Gemini, ProviderKind::Backboard, ProviderKind::OpenAi]
    );
    assert_eq!(sink.records().await.len(), 1);
}

#[tokio::test]
async fn non_retryable_failure_does_not_trigger_fallback() {
    let store = store_with(
        r#"{"providers": {"gemini": {"api_key": "AIza-x"}, "backboard": {"api_key": "bb-x"}}}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default().script(
        ProviderKind::Gemini,
        Err(GenerateError::from_response(ProviderKind::Gemini, 400, "bad request")),
    );

    let generator = Generator::with_backend(backend, store, sink.clone());
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::Gemini);
    let err = generator.generate("prompt", None, &options).await.unwrap_err();

    assert!(matches!(err, GenerateError::Provider { status: 400, .. }));
    assert_eq!(generator_calls(&generator), vec![ProviderKind::Gemini]);
    assert!(sink.records().await.is_empty());
}

#[tokio::test]
async fn fallback_respects_the_enable_toggle() {
    let store = store_with(
        r#"{"enable_fallback": false,
            "providers": {"gemini": {"api_key": "AIza-x"}, "backboard": {"api_key": "bb-x"}}}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::Gemini, Err(quota_error(ProviderKind::Gemini)));

    let generator = Generator::with_backend(backend, store, sink);
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::Gemini);
    let err = generator.generate("prompt", None, &options).await.unwrap_err();

    assert!(matches!(err, GenerateError::Provider { status: 429, .. }));
    assert_eq!(generator_calls(&generator), vec![ProviderKind::Gemini]);
}

#[tokio::test]
async fn implicit_default_failure_does_not_trigger_fallback() {
    // No preference was given, so a retryable failure propagates.
    let store = store_with(
        r#"{"providers": {"gemini": {"api_key": "AIza-x"}, "backboard": {"api_key": "bb-x"}}}"#,
    );
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::Gemini, Err(quota_error(ProviderKind::Gemini)));

    let generator = Generator::with_backend(backend, store, sink);
    let err = generator
        .generate("prompt", None, &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Provider { status: 429, .. }));
    assert_eq!(generator_calls(&generator), vec![ProviderKind::Gemini]);
}

#[tokio::test]
async fn unsupported_provider_error_propagates_without_fallback() {
    let store = store_with(r#"{"providers": {"backboard": {"api_key": "bb-x"}}}"#);
    let sink = Arc::new(MemoryUsageSink::new());
    let backend = ScriptedBackend::default()
        .script(ProviderKind::Cursor, Err(GenerateError::Unsupported(ProviderKind::Cursor)));

    let generator = Generator::with_backend(backend, store, sink);
    let options = GenerationOptions::default().with_preferred_provider(ProviderKind::Cursor);
    let err = generator.generate("prompt", None, &options).await.unwrap_err();

    assert!(matches!(err, GenerateError::Unsupported(ProviderKind::Cursor)));
    assert_eq!(generator_calls(&generator), vec![ProviderKind::Cursor]);
}

// ============================================================================
// Usage Accounting
// ============================================================================

#[tokio::test]
async fn usage_sink_failure_never_fails_generation() {
    let store = store_with(r#"{"providers": {"gemini": {"api_key": "AIza-x"}}}"#);
    let sink = Arc::new(MemoryUsageSink::failing());
    let backend =
        ScriptedBackend::default().script(ProviderKind::Gemini, Ok(completion("gemini-2.5-flash")));

    let generator = Generator::with_backend(backend, store, sink);
    let result = generator
        .generate("prompt", None, &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(result.usage.total_tokens, 300);
    assert!(result.usage.cost > 0.0);
}

#[tokio::test]
async fn success_records_the_serving_model() {
    let store = store_with(r#"{"providers": {"gemini": {"api_key": "AIza-x"}}}"#);
    let sink = Arc::new(MemoryUsageSink::new());
    let backend =
        ScriptedBackend::default().script(ProviderKind::Gemini, Ok(completion("gemini-2.5-flash")));

    let generator = Generator::with_backend(backend, store, sink.clone());
    generator
        .generate("prompt", None, &GenerationOptions::default())
        .await
        .unwrap();

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "gemini-2.5-flash");
    assert_eq!(records[0].input_tokens, 100);
    assert_eq!(records[0].output_tokens, 200);
    assert_eq!(records[0].total_tokens, 300);
    assert_eq!(records[0].operation, "generate");
}

// ============================================================================
// Helpers
// ============================================================================

fn generator_calls(generator: &Generator<ScriptedBackend>) -> Vec<ProviderKind> {
    generator.backend_ref().calls()
}
