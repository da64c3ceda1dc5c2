//! Token pricing and cost calculation.
//!
//! Rates are USD per one million tokens. Backboard resells underlying
//! models with a markup (roughly 8.5x for GPT models), so it gets its own
//! table rather than reusing the vendors' rates. Unknown models fall back
//! to one designated baseline rate per table so cost tracking degrades
//! gracefully instead of silently recording zero.

use crate::models::ProviderKind;

// ============================================================================
// Rates
// ============================================================================

/// Per-million-token rate pair.
#[derive(Debug, Clone, Copy)]
pub struct ModelRate {
    /// USD per 1M input tokens.
    pub input: f64,
    /// USD per 1M output tokens.
    pub output: f64,
}

/// Backboard rates, markup included. Calibrated against observed invoices
/// (gemini-2.5-flash: 1,798 input + 2,766 output tokens billed $0.008200).
const BACKBOARD_RATES: &[(&str, ModelRate)] = &[
    ("gemini-2.5-flash-lite", ModelRate { input: 0.10, output: 0.40 }),
    ("gemini-2.5-flash", ModelRate { input: 0.30, output: 2.50 }),
    ("gemini-2.5-pro", ModelRate { input: 10.63, output: 42.50 }),
    ("gemini-3-flash", ModelRate { input: 0.30, output: 2.50 }),
    ("gemini-3-pro", ModelRate { input: 10.63, output: 42.50 }),
    ("gpt-3.5-turbo", ModelRate { input: 4.25, output: 12.75 }),
    ("gpt-4", ModelRate { input: 255.00, output: 510.00 }),
    ("gpt-4-turbo", ModelRate { input: 85.00, output: 255.00 }),
    ("gpt-4o", ModelRate { input: 21.25, output: 85.00 }),
    ("gpt-4o-mini", ModelRate { input: 1.28, output: 5.10 }),
    ("claude-3-5-haiku", ModelRate { input: 0.85, output: 4.25 }),
    ("claude-3-haiku", ModelRate { input: 0.85, output: 4.25 }),
];

/// Baseline Backboard rate for models missing from the table.
const BACKBOARD_BASELINE: ModelRate = ModelRate { input: 0.64, output: 2.55 };

/// Vendor list prices for everything that is not resold through Backboard.
const STANDARD_RATES: &[(&str, ModelRate)] = &[
    ("gemini-2.5-flash", ModelRate { input: 0.075, output: 0.30 }),
    ("gemini-2.5-pro", ModelRate { input: 1.25, output: 5.00 }),
    ("gemini-3-flash-preview", ModelRate { input: 0.075, output: 0.30 }),
    ("gemini-3-pro", ModelRate { input: 1.25, output: 5.00 }),
    ("gpt-3.5-turbo", ModelRate { input: 0.50, output: 1.50 }),
    ("gpt-4", ModelRate { input: 30.00, output: 60.00 }),
    ("gpt-4-turbo", ModelRate { input: 10.00, output: 30.00 }),
    ("gpt-4o", ModelRate { input: 2.50, output: 10.00 }),
    ("gpt-4o-mini", ModelRate { input: 0.15, output: 0.60 }),
    // Cursor "auto" is billed at GPT-3.5 rates.
    ("auto", ModelRate { input: 0.50, output: 1.50 }),
];

/// Baseline rate for the standard table (gemini-2.5-flash).
const STANDARD_BASELINE: ModelRate = ModelRate { input: 0.075, output: 0.30 };

// ============================================================================
// Cost Calculation
// ============================================================================

fn lookup(table: &[(&str, ModelRate)], model: &str) -> Option<ModelRate> {
    table
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, rate)| *rate)
}

/// Computes the USD cost of a call from billed token counts.
///
/// The model lookup is case-insensitive. The result is always >= 0 and
/// non-decreasing in each of `input_tokens` / `output_tokens`.
pub fn calculate_token_cost(
    provider: ProviderKind,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
) -> f64 {
    let model = model.to_lowercase();
    let (table, baseline) = if provider == ProviderKind::Backboard {
        (BACKBOARD_RATES, BACKBOARD_BASELINE)
    } else {
        (STANDARD_RATES, STANDARD_BASELINE)
    };
    let rate = lookup(table, &model).unwrap_or(baseline);

    let cost = (input_tokens as f64 / 1_000_000.0) * rate.input
        + (output_tokens as f64 / 1_000_000.0) * rate.output;
    cost.max(0.0)
}

/// Rough token estimate for providers that do not report usage
/// (1 token ~= 4 characters).
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

// ============================================================================
// Tests
// ============================================================================
