// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Newsdesk Core
//!
//! Core types and pure logic for the Newsdesk reliability layer.
//!
//! This crate provides the foundational abstractions used across all other
//! Newsdesk crates:
//!
//! - Domain models (providers, generation requests/results, usage records,
//!   distribution records)
//! - Temporal utilities for fixed-offset civil-day comparisons
//! - The token pricing table and cost calculation
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderKind`] - Enum of all supported text-generation providers
//! - [`ProviderConfig`] - Per-provider configuration
//! - [`Settings`] - Resolved generation settings (defaults merged with
//!   persisted overrides)
//!
//! ### Generation Types
//! - [`GenerationOptions`] - Tuning knobs for a generation call
//! - [`GenerationResult`] - Generated content plus billing metadata
//! - [`Completion`] - Raw adapter output before cost attribution
//! - [`TokenUsage`] - Input/output token counts and cost
//!
//! ### Telemetry & Distribution
//! - [`UsageRecord`] - One billable usage event
//! - [`DistributionRecord`] - One item pushed to a channel
//! - [`Channel`] / [`DeliveryStatus`] - Distribution dimensions

pub mod models;
pub mod pricing;
pub mod time;

// Re-export all model types
pub use models::{
    // Provider types
    ProviderConfig,
    ProviderKind,
    Settings,
    // Generation types
    Completion,
    GenerationOptions,
    GenerationResult,
    TokenUsage,
    // Telemetry
    UsageRecord,
    // Distribution
    BlogEntry,
    Channel,
    DeliveryStatus,
    DistributionRecord,
    IngestRecord,
};
