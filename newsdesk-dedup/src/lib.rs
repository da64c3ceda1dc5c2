// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Newsdesk Dedup
//!
//! Duplicate-content detection for the distribution pipeline.
//!
//! Decides whether an ingested item was already distributed today, per
//! channel, using fixed-offset civil-day windows and truncation-tolerant
//! title matching. Store failures fail open to "not duplicate" so an
//! outage never silently drops fresh content.

pub mod detector;
pub mod matching;

pub use detector::{DuplicateChecker, DuplicateVerdict};
pub use matching::{
    MIN_TITLE_MATCH_LEN, TRUNCATION_PREFIX_MIN_LEN, normalize_title, normalize_url, titles_match,
};
