//! Provider-related types.
//!
//! This module contains types describing the closed set of external
//! text-generation providers:
//! - [`ProviderKind`] - Enum of supported providers
//! - [`ProviderConfig`] - Per-provider configuration
//! - [`Settings`] - Resolved generation settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported text-generation provider kinds.
///
/// The set is closed by design: dispatch over providers is an exhaustive
/// match, so adding a provider means adding one variant plus one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions.
    OpenAi,
    /// Google Gemini.
    Gemini,
    /// Backboard.io (aggregator/reseller over many underlying models).
    Backboard,
    /// Generic OpenAI-compatible endpoint.
    Custom,
    /// Hugging Face inference API (works without an API key for many models).
    HuggingFace,
    /// Cursor agent (configurable but not dispatchable by the generic
    /// orchestrator; it needs repository context).
    Cursor,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Gemini => "Gemini",
            Self::Backboard => "Backboard",
            Self::Custom => "Custom",
            Self::HuggingFace => "Hugging Face",
            Self::Cursor => "Cursor",
        }
    }

    /// Returns all provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::OpenAi,
            Self::Gemini,
            Self::Backboard,
            Self::Custom,
            Self::HuggingFace,
            Self::Cursor,
        ]
    }

    /// Returns true if this provider can be called without an API key.
    pub fn is_keyless_capable(&self) -> bool {
        matches!(self, Self::HuggingFace | Self::Cursor)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Provider Config
// ============================================================================

/// Configuration for a single provider.
///
/// Invariant (maintained by the settings merge): `enabled` implies a
/// credential is present or the provider is keyless-capable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider this configures.
    pub kind: ProviderKind,
    /// API credential. Optional for keyless-capable providers.
    pub api_key: Option<String>,
    /// Model identifier to request.
    pub model: String,
    /// Endpoint override (Backboard and Custom use this).
    pub endpoint: Option<String>,
    /// Whether the provider participates in generation.
    pub enabled: bool,
    /// Human-readable label for admin surfaces.
    pub label: String,
}

impl ProviderConfig {
    /// Returns true if a non-empty credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Returns true if the enabled/credential invariant holds.
    pub fn is_well_formed(&self) -> bool {
        !self.enabled || self.has_credential() || self.kind.is_keyless_capable()
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Resolved generation settings.
///
/// Produced by merging the persisted settings blob with built-in defaults at
/// the start of each orchestrator invocation; never mutated mid-call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Provider used when no preference is given.
    pub default_provider: ProviderKind,
    /// First candidate of the fallback chain.
    pub fallback_provider: ProviderKind,
    /// Whether classified-retryable failures may trigger the fallback chain.
    pub enable_fallback: bool,
    /// Per-provider configuration, complete over the closed provider set.
    pub providers: HashMap<ProviderKind, ProviderConfig>,
}

impl Settings {
    /// Returns the config for the given provider, or the default provider's
    /// config when `kind` is `None`.
    pub fn provider_config(&self, kind: Option<ProviderKind>) -> Option<&ProviderConfig> {
        self.providers.get(&kind.unwrap_or(self.default_provider))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyless_capable_set() {
        assert!(ProviderKind::HuggingFace.is_keyless_capable());
        assert!(ProviderKind::Cursor.is_keyless_capable());
        assert!(!ProviderKind::OpenAi.is_keyless_capable());
        assert!(!ProviderKind::Gemini.is_keyless_capable());
        assert!(!ProviderKind::Backboard.is_keyless_capable());
        assert!(!ProviderKind::Custom.is_keyless_capable());
    }

    #[test]
    fn test_has_credential_treats_empty_as_absent() {
        let mut config = ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: Some(String::new()),
            model: "gpt-3.5-turbo".to_string(),
            endpoint: None,
            enabled: false,
            label: "OpenAI".to_string(),
        };
        assert!(!config.has_credential());

        config.api_key = Some("sk-test".to_string());
        assert!(config.has_credential());

        config.api_key = None;
        assert!(!config.has_credential());
    }

    #[test]
    fn test_well_formed_invariant() {
        let enabled_without_key = ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            endpoint: None,
            enabled: true,
            label: "OpenAI".to_string(),
        };
        assert!(!enabled_without_key.is_well_formed());

        let keyless_enabled = ProviderConfig {
            kind: ProviderKind::HuggingFace,
            api_key: None,
            model: "facebook/bart-large-cnn".to_string(),
            endpoint: None,
            enabled: true,
            label: "Hugging Face".to_string(),
        };
        assert!(keyless_enabled.is_well_formed());
    }
}
