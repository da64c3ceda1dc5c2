//! Distribution log and content-store projections.
//!
//! These types are read-only inputs to the duplicate-content detector. The
//! stores that produce them are external collaborators; only the shape of a
//! returned page is specified here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Channel & Status
// ============================================================================

/// Distribution channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Messaging channel (Telegram).
    Telegram,
    /// Long-form content store (the blog).
    Blog,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Telegram => write!(f, "telegram"),
            Channel::Blog => write!(f, "blog"),
        }
    }
}

/// Terminal (or in-flight) delivery status of a distribution attempt.
///
/// `Pending` rows exist so an external transactional guard can stop two
/// tasks racing on the same item; the duplicate detector ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Delivered successfully.
    Success,
    /// Delivery failed; the item may be reprocessed.
    Error,
    /// Delivery in progress.
    Pending,
}

// ============================================================================
// Distribution Record
// ============================================================================

/// One item pushed to a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionRecord {
    /// Raw item title.
    pub title: String,
    /// Normalized title (deterministic, idempotent function of `title`).
    pub normalized_title: String,
    /// Original article URL, when known.
    pub original_url: Option<String>,
    /// RSS feed URL the item came from, when known.
    pub feed_url: Option<String>,
    /// Channel the item was pushed to.
    pub channel: Channel,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// When the item was processed.
    pub processed_at: DateTime<Utc>,
}

// ============================================================================
// Store Projections
// ============================================================================

/// Projection of a long-form content entry, as returned by the blog index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogEntry {
    /// Entry title.
    pub title: String,
    /// Source article URL, when the entry was generated from an ingested
    /// item.
    pub source_url: Option<String>,
}

/// Projection of a unified ingestion-log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRecord {
    /// Item title.
    pub title: String,
    /// Original article URL, when known.
    pub original_url: Option<String>,
    /// RSS feed URL, when known.
    pub feed_url: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}
