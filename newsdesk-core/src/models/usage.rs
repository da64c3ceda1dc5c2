//! Billable usage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;
use crate::pricing::calculate_token_cost;

// ============================================================================
// Usage Record
// ============================================================================

/// One billable usage event.
///
/// Created exactly once per successful adapter call; persistence failures
/// are swallowed by the tracker so telemetry never blocks distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Provider that served the call.
    pub provider: ProviderKind,
    /// Model that served the call.
    pub model: String,
    /// Input (prompt) tokens.
    pub input_tokens: u64,
    /// Output (completion) tokens.
    pub output_tokens: u64,
    /// Total tokens (input + output).
    pub total_tokens: u64,
    /// Cost in USD, always >= 0.
    pub cost: f64,
    /// Operation tag (e.g. "generate", "summarize").
    pub operation: String,
    /// Linked content id, when the call was made for a specific item.
    pub news_id: Option<i64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Builds a record, computing total tokens and cost from the pricing
    /// table.
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
        operation: impl Into<String>,
        news_id: Option<i64>,
    ) -> Self {
        let model = model.into();
        let cost = calculate_token_cost(provider, &model, input_tokens, output_tokens);
        Self {
            provider,
            model,
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost,
            operation: operation.into(),
            news_id,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
