//! Provider registry: built-in defaults and the persisted-settings merge.
//!
//! Settings live in one JSON blob behind [`SettingsBlobStore`]. The blob is
//! sparse (every field optional) and the merge lays it over the built-in
//! defaults, so a blob written by an older build still resolves to a
//! complete [`Settings`] value. The merge is a pure function; storage and
//! parse failures degrade to the defaults rather than failing generation.

use std::collections::HashMap;

use newsdesk_core::{ProviderConfig, ProviderKind, Settings};
use newsdesk_store::{SettingsBlobStore, StoreError};
use serde::Deserialize;
use tracing::{error, warn};

use crate::adapters::backboard;

/// Blob key under which the generation settings are stored.
pub const AI_SETTINGS_KEY: &str = "ai_settings";

// ============================================================================
// Defaults
// ============================================================================

fn default_config(kind: ProviderKind) -> ProviderConfig {
    let (model, endpoint, enabled, label) = match kind {
        ProviderKind::OpenAi => ("gpt-3.5-turbo", None, false, "OpenAI (GPT-3.5 / GPT-4o)"),
        ProviderKind::Gemini => ("gemini-2.5-flash", None, false, "Google Gemini (Flash)"),
        ProviderKind::Backboard => (
            "gpt-3.5-turbo",
            Some(backboard::DEFAULT_ENDPOINT),
            false,
            "Backboard.io (model aggregator)",
        ),
        ProviderKind::Custom => ("gpt-4o-mini", None, false, "Custom OpenAI-compatible endpoint"),
        // Keyless, so enabled out of the box.
        ProviderKind::HuggingFace => (
            "facebook/bart-large-cnn",
            None,
            true,
            "Hugging Face (free inference API)",
        ),
        ProviderKind::Cursor => ("auto", None, false, "Cursor Agent"),
    };
    ProviderConfig {
        kind,
        api_key: None,
        model: model.to_string(),
        endpoint: endpoint.map(str::to_string),
        enabled,
        label: label.to_string(),
    }
}

/// Built-in default settings.
///
/// Ships with no credentials: keyed providers start disabled and must be
/// configured through the admin surface before they participate.
pub fn default_settings() -> Settings {
    let providers = ProviderKind::all()
        .iter()
        .map(|&kind| (kind, default_config(kind)))
        .collect();
    Settings {
        default_provider: ProviderKind::Gemini,
        fallback_provider: ProviderKind::Backboard,
        enable_fallback: true,
        providers,
    }
}

// ============================================================================
// Persisted Shape
// ============================================================================

/// Sparse on-disk settings shape. Every field is optional so blobs written
/// by any build version parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    /// Default provider override.
    pub default_provider: Option<ProviderKind>,
    /// Fallback provider override.
    pub fallback_provider: Option<ProviderKind>,
    /// Fallback toggle override.
    pub enable_fallback: Option<bool>,
    /// Per-provider overrides.
    pub providers: HashMap<ProviderKind, PersistedProviderConfig>,
}

/// Sparse per-provider override.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersistedProviderConfig {
    /// Credential override. Empty strings are treated as absent.
    pub api_key: Option<String>,
    /// Model override. Empty strings are treated as absent.
    pub model: Option<String>,
    /// Endpoint override. Empty strings are treated as absent.
    pub endpoint: Option<String>,
    /// Enabled override.
    pub enabled: Option<bool>,
    /// Label override.
    pub label: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Merge
// ============================================================================

/// Lays persisted overrides over the built-in defaults.
///
/// Two rules beyond plain field-wise override:
/// - A credentialed Backboard or Gemini is always enabled, even when the
///   blob says otherwise. Operators kept disabling the workhorse providers
///   by accident; a stored credential is the stronger signal of intent.
/// - `enabled` only sticks when the provider has a credential or is
///   keyless-capable, so resolved settings always satisfy the
///   enabled-implies-usable invariant.
pub fn merge_with_defaults(persisted: Option<PersistedSettings>) -> Settings {
    let mut merged = default_settings();
    let Some(persisted) = persisted else {
        return merged;
    };

    if let Some(kind) = persisted.default_provider {
        merged.default_provider = kind;
    }
    if let Some(kind) = persisted.fallback_provider {
        merged.fallback_provider = kind;
    }
    if let Some(enable) = persisted.enable_fallback {
        merged.enable_fallback = enable;
    }

    for (kind, overrides) in persisted.providers {
        let Some(config) = merged.providers.get_mut(&kind) else {
            continue;
        };
        if let Some(key) = non_empty(overrides.api_key) {
            config.api_key = Some(key);
        }
        if let Some(model) = non_empty(overrides.model) {
            config.model = model;
        }
        if let Some(endpoint) = non_empty(overrides.endpoint) {
            config.endpoint = Some(endpoint);
        }
        if let Some(label) = non_empty(overrides.label) {
            config.label = label;
        }

        let force_enabled = matches!(kind, ProviderKind::Backboard | ProviderKind::Gemini)
            && config.has_credential();
        let requested = overrides.enabled.unwrap_or(config.enabled);
        config.enabled = force_enabled
            || (requested && (config.has_credential() || kind.is_keyless_capable()));
    }

    merged
}

// ============================================================================
// Resolve / Save
// ============================================================================

/// Loads and merges settings from the store.
///
/// Never fails: a missing blob, an unparseable blob, or an unavailable
/// store all resolve to the built-in defaults.
pub async fn resolve_settings(store: &dyn SettingsBlobStore) -> Settings {
    match store.get_blob(AI_SETTINGS_KEY).await {
        Ok(Some(blob)) => match serde_json::from_str::<PersistedSettings>(&blob) {
            Ok(persisted) => merge_with_defaults(Some(persisted)),
            Err(e) => {
                error!(error = %e, "Failed to parse settings blob, using defaults");
                default_settings()
            }
        },
        Ok(None) => default_settings(),
        Err(e) => {
            warn!(error = %e, "Settings store unavailable, using defaults");
            default_settings()
        }
    }
}

/// Persists settings, sanitizing them through the merge first so stored
/// blobs always satisfy the same invariants a resolve would produce.
///
/// # Errors
///
/// Returns an error when serialization or the blob write fails.
pub async fn save_settings(
    store: &dyn SettingsBlobStore,
    settings: &Settings,
) -> Result<Settings, StoreError> {
    let sanitized = merge_with_defaults(Some(settings.into()));
    let blob = serde_json::to_string(&sanitized)?;
    store.put_blob(AI_SETTINGS_KEY, &blob).await?;
    Ok(sanitized)
}

impl From<&Settings> for PersistedSettings {
    fn from(settings: &Settings) -> Self {
        let providers = settings
            .providers
            .iter()
            .map(|(&kind, config)| {
                (
                    kind,
                    PersistedProviderConfig {
                        api_key: config.api_key.clone(),
                        model: Some(config.model.clone()),
                        endpoint: config.endpoint.clone(),
                        enabled: Some(config.enabled),
                        label: Some(config.label.clone()),
                    },
                )
            })
            .collect();
        Self {
            default_provider: Some(settings.default_provider),
            fallback_provider: Some(settings.fallback_provider),
            enable_fallback: Some(settings.enable_fallback),
            providers,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
