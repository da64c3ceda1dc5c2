//! Per-provider HTTP adapters.
//!
//! Each adapter turns one `(config, prompt, options)` call into the
//! provider's wire format and back into a [`newsdesk_core::Completion`].
//! Adapters report the model that actually served the call, which can
//! differ from the configured one (defaults filled in, aggregator
//! substitutions).
//!
//! OpenAI, Backboard, and custom endpoints all speak the chat-completions
//! shape, so its wire types live in [`openai`] and are shared.

pub mod backboard;
pub mod custom;
pub mod gemini;
pub mod huggingface;
pub mod openai;
