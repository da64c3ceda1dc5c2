// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Newsdesk Providers
//!
//! Provider registry, HTTP adapters, and the generation orchestrator.
//!
//! This crate is the AI half of the reliability layer: it resolves
//! generation settings from a blob store, dispatches prompts to a closed
//! set of text-generation providers, classifies failures, sweeps a
//! fallback chain, and records billable usage.

pub mod adapters;
pub mod backend;
pub mod error;
pub mod generator;
pub mod registry;
pub mod tracker;

pub use backend::{CompletionBackend, HttpBackend};
pub use error::{ErrorClass, GenerateError};
pub use generator::Generator;
pub use registry::{
    AI_SETTINGS_KEY, PersistedProviderConfig, PersistedSettings, default_settings,
    merge_with_defaults, resolve_settings, save_settings,
};
pub use tracker::{GENERATE_OPERATION, track_token_usage};
