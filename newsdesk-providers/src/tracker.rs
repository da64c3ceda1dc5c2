//! Billable usage tracking.
//!
//! Telemetry never blocks distribution: a failed usage write is logged and
//! swallowed, and the caller still gets the computed usage back.

use newsdesk_core::{ProviderKind, TokenUsage, UsageRecord};
use newsdesk_store::UsageSink;
use tracing::{debug, warn};

/// Operation tag recorded for orchestrated generations.
pub const GENERATE_OPERATION: &str = "generate";

/// Computes cost for one call and records it to the sink.
///
/// The returned [`TokenUsage`] is valid whether or not the sink write
/// succeeded.
pub async fn track_token_usage(
    sink: &dyn UsageSink,
    provider: ProviderKind,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
    operation: &str,
    news_id: Option<i64>,
) -> TokenUsage {
    let record = UsageRecord::new(provider, model, input_tokens, output_tokens, operation, news_id);
    let usage = TokenUsage::new(input_tokens, output_tokens, record.cost);
    debug!(
        provider = %provider,
        model,
        total_tokens = usage.total_tokens,
        cost = usage.cost,
        "Tracking token usage"
    );

    if let Err(e) = sink.record_usage(record).await {
        warn!(provider = %provider, error = %e, "Failed to record token usage, continuing");
    }
    usage
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_store::MemoryUsageSink;

    #[tokio::test]
    async fn test_usage_is_recorded_once() {
        let sink = MemoryUsageSink::new();
        let usage = track_token_usage(
            &sink,
            ProviderKind::Backboard,
            "gpt-3.5-turbo",
            1_000,
            2_000,
            GENERATE_OPERATION,
            Some(42),
        )
        .await;

        assert_eq!(usage.total_tokens, 3_000);
        assert!(usage.cost > 0.0);

        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, "generate");
        assert_eq!(records[0].news_id, Some(42));
        assert!((records[0].cost - usage.cost).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let sink = MemoryUsageSink::failing();
        let usage = track_token_usage(
            &sink,
            ProviderKind::OpenAi,
            "gpt-4o",
            500,
            500,
            GENERATE_OPERATION,
            None,
        )
        .await;

        assert_eq!(usage.total_tokens, 1_000);
        assert!(usage.cost > 0.0);
    }
}
