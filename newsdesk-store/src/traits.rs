//! Store trait definitions.
//!
//! The reliability layer holds no locks and assumes read-committed
//! consistency; implementations are externally synchronized.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsdesk_core::{BlogEntry, Channel, DistributionRecord, IngestRecord, UsageRecord};

use crate::error::StoreError;

/// Get/put of one opaque configuration blob under a fixed key.
///
/// The generation settings live in a single JSON blob; the merge logic in
/// the provider registry never depends on the storage engine behind this
/// trait.
#[async_trait]
pub trait SettingsBlobStore: Send + Sync {
    /// Returns the blob stored under `key`, if any.
    async fn get_blob(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous blob.
    async fn put_blob(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Append-only sink for billable usage telemetry.
///
/// Callers must treat failures as non-fatal: a failed telemetry write never
/// blocks distribution.
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Persists one usage record.
    async fn record_usage(&self, record: UsageRecord) -> Result<(), StoreError>;
}

/// Queryable log of prior distribution attempts.
#[async_trait]
pub trait DistributionLog: Send + Sync {
    /// Returns records for `channel` with `Success` status whose
    /// `processed_at` falls inside `[from, to]`, most recent first, at most
    /// `limit` rows. Pending and Error rows are never returned.
    async fn recent_successes(
        &self,
        channel: Channel,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DistributionRecord>, StoreError>;
}

/// Projection over the long-form content store.
#[async_trait]
pub trait BlogIndex: Send + Sync {
    /// Returns up to `limit` active entries (published, draft, or pending),
    /// most recent first.
    async fn active_entries(&self, limit: usize) -> Result<Vec<BlogEntry>, StoreError>;
}

/// Queryable unified ingestion log.
#[async_trait]
pub trait IngestLog: Send + Sync {
    /// Returns up to `limit` rows created inside `[from, to]` that were
    /// distributed to at least one channel.
    async fn distributed_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<IngestRecord>, StoreError>;
}
