//! In-memory store implementations.
//!
//! Used by tests and by embedders that supply their own persistence. The
//! usage sink can be constructed in a failing mode to exercise the
//! telemetry-never-blocks contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsdesk_core::{
    BlogEntry, Channel, DeliveryStatus, DistributionRecord, IngestRecord, UsageRecord,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::traits::{BlogIndex, DistributionLog, IngestLog, SettingsBlobStore, UsageSink};

// ============================================================================
// Settings
// ============================================================================

/// In-memory settings blob store.
#[derive(Default)]
pub struct MemorySettingsStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with one blob.
    pub fn with_blob(key: &str, value: &str) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.to_string(), value.to_string());
        Self {
            blobs: RwLock::new(blobs),
        }
    }
}

#[async_trait]
impl SettingsBlobStore for MemorySettingsStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Usage
// ============================================================================

/// In-memory usage sink.
#[derive(Default)]
pub struct MemoryUsageSink {
    records: RwLock<Vec<UsageRecord>>,
    failing: bool,
}

impl MemoryUsageSink {
    /// Creates a sink that accepts every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects every record, for exercising the
    /// swallow-telemetry-failures contract.
    pub fn failing() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            failing: true,
        }
    }

    /// Returns a copy of everything recorded so far.
    pub async fn records(&self) -> Vec<UsageRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl UsageSink for MemoryUsageSink {
    async fn record_usage(&self, record: UsageRecord) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("usage sink offline".to_string()));
        }
        self.records.write().await.push(record);
        Ok(())
    }
}

// ============================================================================
// Distribution Log
// ============================================================================

/// In-memory distribution log.
#[derive(Default)]
pub struct MemoryDistributionLog {
    records: RwLock<Vec<DistributionRecord>>,
}

impl MemoryDistributionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub async fn push(&self, record: DistributionRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl DistributionLog for MemoryDistributionLog {
    async fn recent_successes(
        &self,
        channel: Channel,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DistributionRecord>, StoreError> {
        let mut page: Vec<DistributionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| {
                r.channel == channel
                    && r.status == DeliveryStatus::Success
                    && r.processed_at >= from
                    && r.processed_at <= to
            })
            .cloned()
            .collect();
        page.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        page.truncate(limit);
        Ok(page)
    }
}

// ============================================================================
// Blog Index
// ============================================================================

/// In-memory blog index.
#[derive(Default)]
pub struct MemoryBlogIndex {
    entries: RwLock<Vec<BlogEntry>>,
}

impl MemoryBlogIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub async fn push(&self, entry: BlogEntry) {
        self.entries.write().await.push(entry);
    }
}

#[async_trait]
impl BlogIndex for MemoryBlogIndex {
    async fn active_entries(&self, limit: usize) -> Result<Vec<BlogEntry>, StoreError> {
        let mut page = self.entries.read().await.clone();
        page.truncate(limit);
        Ok(page)
    }
}

// ============================================================================
// Ingest Log
// ============================================================================

/// In-memory unified ingestion log. Every stored row is treated as
/// distributed to at least one channel.
#[derive(Default)]
pub struct MemoryIngestLog {
    records: RwLock<Vec<IngestRecord>>,
}

impl MemoryIngestLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub async fn push(&self, record: IngestRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl IngestLog for MemoryIngestLog {
    async fn distributed_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<IngestRecord>, StoreError> {
        let mut page: Vec<IngestRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.created_at >= from && r.created_at <= to)
            .cloned()
            .collect();
        page.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page.truncate(limit);
        Ok(page)
    }
}

// ============================================================================
// Tests
// ============================================================================
