//! Domain models for the Newsdesk reliability layer.
//!
//! Split by concern:
//! - [`provider`] - Provider identifiers and configuration
//! - [`generation`] - Generation requests, results, and token usage
//! - [`usage`] - Billable usage records
//! - [`distribution`] - Distribution log and content-store projections

pub mod distribution;
pub mod generation;
pub mod provider;
pub mod usage;

pub use distribution::{BlogEntry, Channel, DeliveryStatus, DistributionRecord, IngestRecord};
pub use generation::{Completion, GenerationOptions, GenerationResult, TokenUsage};
pub use provider::{ProviderConfig, ProviderKind, Settings};
pub use usage::UsageRecord;

#[cfg(test)]
mod serde_tests;
