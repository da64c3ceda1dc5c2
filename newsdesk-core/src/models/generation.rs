//! Generation request and result types.

use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;

/// Default sampling temperature (from the production configuration).
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default output token cap.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

// ============================================================================
// Options
// ============================================================================

/// Tuning knobs for a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Explicit provider preference. When set, a disabled-but-credentialed
    /// provider may still be used, and classified-retryable failures become
    /// eligible for the fallback chain.
    pub preferred_provider: Option<ProviderKind>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            preferred_provider: None,
        }
    }
}

impl GenerationOptions {
    /// Sets the preferred provider.
    pub fn with_preferred_provider(mut self, kind: ProviderKind) -> Self {
        self.preferred_provider = Some(kind);
        self
    }
}

// ============================================================================
// Adapter Output
// ============================================================================

/// Raw output of one provider adapter call, before cost attribution.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text.
    pub content: String,
    /// Model that actually served the call. Can differ from the configured
    /// model (adapters fill in defaults and the aggregator substitutes
    /// models it cannot serve).
    pub model: String,
    /// Input (prompt) tokens billed by the provider.
    pub input_tokens: u64,
    /// Output (completion) tokens billed by the provider.
    pub output_tokens: u64,
}

// ============================================================================
// Token Usage
// ============================================================================

/// Token counts and cost for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input (prompt) tokens.
    pub input_tokens: u64,
    /// Output (completion) tokens.
    pub output_tokens: u64,
    /// Total tokens (input + output).
    pub total_tokens: u64,
    /// Cost in USD.
    pub cost: f64,
}

impl TokenUsage {
    /// Creates a usage value; total is always input + output.
    pub fn new(input_tokens: u64, output_tokens: u64, cost: f64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost,
        }
    }
}

// ============================================================================
// Generation Result
// ============================================================================

/// Result of a successful generation, including which provider and model
/// actually served the call (they can differ from the request after a
/// default redirect or a fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated content.
    pub content: String,
    /// Provider that produced the content.
    pub provider: ProviderKind,
    /// Model that produced the content.
    pub model: String,
    /// Billing metadata.
    pub usage: TokenUsage,
}

// ============================================================================
// Tests
// ============================================================================
