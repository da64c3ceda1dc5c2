//! Duplicate-content decisions against same-day records.
//!
//! All day windows are civil days at the newsroom's fixed offset. A store
//! failure fails open to "not duplicate": re-distributing an item is
//! recoverable, silently dropping new content is not.
//!
//! The feed-URL gate is the load-bearing rule: when the new item carries a
//! feed URL and a candidate does too, the feed URLs must normalize
//! identically before titles are even compared. Two sources running the
//! same headline on the same day are different news items.

use std::sync::Arc;

use newsdesk_core::time::{today_end, today_start};
use newsdesk_core::{BlogEntry, Channel, DistributionRecord, IngestRecord};
use newsdesk_store::{BlogIndex, DistributionLog, IngestLog};
use tracing::{debug, info, warn};

use crate::matching::{normalize_title, normalize_url, titles_match};

/// Page bound for same-day distribution records.
const DISTRIBUTION_PAGE_LIMIT: usize = 200;

/// Page bound for active blog entries.
const BLOG_PAGE_LIMIT: usize = 500;

/// Page bound for same-day ingest-log rows.
const INGEST_PAGE_LIMIT: usize = 200;

/// Per-channel duplicate verdict, so callers can suppress one channel
/// while still publishing to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateVerdict {
    /// Already pushed to the messaging channel today.
    pub telegram: bool,
    /// Already present in the long-form content store.
    pub blog: bool,
    /// Already recorded in today's unified ingestion log.
    pub unified_log: bool,
}

impl DuplicateVerdict {
    /// True when the item duplicates anything anywhere.
    pub fn any(&self) -> bool {
        self.telegram || self.blog || self.unified_log
    }
}

fn title_prefix(title: &str) -> String {
    title.chars().take(40).collect()
}

/// Duplicate-content detector over the three read-only stores.
pub struct DuplicateChecker {
    distribution: Arc<dyn DistributionLog>,
    blog: Arc<dyn BlogIndex>,
    ingest: Arc<dyn IngestLog>,
}

impl DuplicateChecker {
    /// Creates a checker over the given stores.
    pub fn new(
        distribution: Arc<dyn DistributionLog>,
        blog: Arc<dyn BlogIndex>,
        ingest: Arc<dyn IngestLog>,
    ) -> Self {
        Self {
            distribution,
            blog,
            ingest,
        }
    }

    /// Runs all three duplicate checks concurrently.
    ///
    /// The checks are independent and read-only, so they are issued in
    /// parallel; each fails open on its own.
    pub async fn is_duplicate_content(
        &self,
        title: &str,
        source_url: Option<&str>,
        feed_url: Option<&str>,
    ) -> DuplicateVerdict {
        let (telegram, blog, unified_log) = tokio::join!(
            self.is_duplicate_telegram(title, source_url, feed_url),
            self.is_duplicate_blog(title, source_url),
            self.is_duplicate_unified(title, feed_url),
        );
        DuplicateVerdict {
            telegram,
            blog,
            unified_log,
        }
    }

    /// Checks whether an item with this title (and optionally URL / feed
    /// URL) was already pushed to the messaging channel today.
    ///
    /// Only terminal-success records count: errored items may be
    /// reprocessed, and pending rows belong to the external transactional
    /// guard.
    pub async fn is_duplicate_telegram(
        &self,
        title: &str,
        url: Option<&str>,
        feed_url: Option<&str>,
    ) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let normalized = normalize_title(title);
        let new_feed = feed_url.map(normalize_url);

        let from = today_start();
        let to = today_end();
        let records = match self
            .distribution
            .recent_successes(Channel::Telegram, from, to, DISTRIBUTION_PAGE_LIMIT)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    title = %title_prefix(title),
                    window_start = %from,
                    window_end = %to,
                    error = %e,
                    "Distribution log unavailable, treating as not duplicate"
                );
                return false;
            }
        };
        debug!(
            candidates = records.len(),
            title = %title_prefix(title),
            "Checking today's messaging distributions"
        );

        for record in &records {
            if matches_distribution(record, &normalized, url, new_feed.as_deref()) {
                info!(
                    title = %title_prefix(title),
                    stored = %title_prefix(&record.title),
                    "Duplicate messaging distribution found"
                );
                return true;
            }
        }
        false
    }

    /// Checks whether an entry with this title (confirmed by source URL
    /// when both sides have one) already exists in the long-form store.
    ///
    /// No day window here: long-form entries stay live indefinitely.
    pub async fn is_duplicate_blog(&self, title: &str, source_url: Option<&str>) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let normalized = normalize_title(title);
        let new_source = source_url.map(normalize_url);

        let entries = match self.blog.active_entries(BLOG_PAGE_LIMIT).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    title = %title_prefix(title),
                    error = %e,
                    "Blog index unavailable, treating as not duplicate"
                );
                return false;
            }
        };

        for entry in &entries {
            if matches_blog_entry(entry, &normalized, new_source.as_deref()) {
                info!(
                    title = %title_prefix(title),
                    stored = %title_prefix(&entry.title),
                    "Duplicate long-form entry found"
                );
                return true;
            }
        }
        false
    }

    /// Checks whether a row with this title (gated by feed URL when both
    /// sides have one) exists in today's unified ingestion log.
    pub async fn is_duplicate_unified(&self, title: &str, feed_url: Option<&str>) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let normalized = normalize_title(title);
        let new_feed = feed_url.map(normalize_url);

        let from = today_start();
        let to = today_end();
        let rows = match self
            .ingest
            .distributed_in_window(from, to, INGEST_PAGE_LIMIT)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    title = %title_prefix(title),
                    window_start = %from,
                    window_end = %to,
                    error = %e,
                    "Ingest log unavailable, treating as not duplicate"
                );
                return false;
            }
        };

        for row in &rows {
            if matches_ingest_row(row, &normalized, new_feed.as_deref()) {
                info!(
                    title = %title_prefix(title),
                    stored = %title_prefix(&row.title),
                    "Duplicate ingest-log row found"
                );
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Candidate Matching
// ============================================================================

fn matches_distribution(
    record: &DistributionRecord,
    normalized: &str,
    url: Option<&str>,
    new_feed: Option<&str>,
) -> bool {
    let stored_title = normalize_title(&record.title);
    let stored_feed = record.feed_url.as_deref().map(normalize_url);

    match (new_feed, stored_feed.as_deref()) {
        // Both sides know their feed: the gate applies. Differing feeds
        // are never a duplicate regardless of title.
        (Some(new), Some(stored)) => new == stored && titles_match(&stored_title, normalized),
        // The candidate predates feed tracking: fall back to the title
        // alone.
        (Some(_), None) => titles_match(&stored_title, normalized),
        // The new item carries no feed but the candidate does: treat as
        // different news.
        (None, Some(_)) => false,
        // Neither side has a feed: title first, then the original URL as
        // a last resort.
        (None, None) => {
            if titles_match(&stored_title, normalized) {
                return true;
            }
            match (url, record.original_url.as_deref()) {
                (Some(new_url), Some(stored_url)) => {
                    normalize_url(new_url) == normalize_url(stored_url)
                }
                _ => false,
            }
        }
    }
}

fn matches_blog_entry(entry: &BlogEntry, normalized: &str, new_source: Option<&str>) -> bool {
    let stored_title = normalize_title(&entry.title);
    if !titles_match(&stored_title, normalized) {
        return false;
    }
    match (new_source, entry.source_url.as_deref()) {
        // Title match plus a source-URL confirmation when both sides have
        // one.
        (Some(new), Some(stored)) => new == normalize_url(stored),
        // Either side lacks a source URL: the title match stands.
        _ => true,
    }
}

fn matches_ingest_row(row: &IngestRecord, normalized: &str, new_feed: Option<&str>) -> bool {
    let stored_title = normalize_title(&row.title);
    if !titles_match(&stored_title, normalized) {
        return false;
    }
    match (new_feed, row.feed_url.as_deref()) {
        (Some(new), Some(stored)) => new == normalize_url(stored),
        _ => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
