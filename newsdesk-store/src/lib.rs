// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Newsdesk Store
//!
//! Store abstractions for the Newsdesk reliability layer.
//!
//! The reliability layer treats every store as an external collaborator
//! behind a narrow trait:
//!
//! - [`SettingsBlobStore`] - get/put of one opaque configuration blob under
//!   a fixed key
//! - [`UsageSink`] - append-only billable usage telemetry
//! - [`DistributionLog`] - bounded, most-recent-first pages of distribution
//!   records filtered by day window and terminal status
//! - [`BlogIndex`] - projection of active long-form entries
//! - [`IngestLog`] - today's unified ingestion rows
//!
//! Two families of implementations ship here: JSON-file-backed (for the
//! settings blob) and in-memory (for tests and embedding).

pub mod error;
pub mod memory;
pub mod persistence;
pub mod settings_store;
pub mod traits;

pub use error::StoreError;
pub use memory::{
    MemoryBlogIndex, MemoryDistributionLog, MemoryIngestLog, MemorySettingsStore, MemoryUsageSink,
};
pub use settings_store::FileSettingsStore;
pub use traits::{BlogIndex, DistributionLog, IngestLog, SettingsBlobStore, UsageSink};
