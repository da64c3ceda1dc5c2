//! Generation error taxonomy.
//!
//! Failures carry structure (provider, HTTP status, body snippet) so the
//! orchestrator can classify them without sniffing message text. The
//! classification drives exactly one decision: whether a failure is worth
//! retrying on a different provider.

use newsdesk_core::ProviderKind;
use thiserror::Error;

/// Longest error body snippet kept on a [`GenerateError::Provider`].
const BODY_SNIPPET_MAX: usize = 200;

// ============================================================================
// Error Class
// ============================================================================

/// Coarse failure class used by the fallback decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Quota exhausted or rate limited (HTTP 429).
    QuotaOrRateLimit,
    /// Transient server-side or transport failure (HTTP 5xx, network).
    Transient,
    /// Everything else: bad request, auth failure, malformed response.
    /// Retrying elsewhere would not help, so these never trigger fallback.
    Other,
}

// ============================================================================
// Generate Error
// ============================================================================

/// Error produced by a generation attempt.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The provider is disabled or missing required configuration.
    #[error("{0} is not enabled or is missing configuration (API key or endpoint)")]
    Configuration(ProviderKind),

    /// The provider cannot serve context-free generation at all.
    #[error("{0} cannot serve standalone text generation")]
    Unsupported(ProviderKind),

    /// The provider returned a non-success HTTP status.
    #[error("{provider} API error ({status}): {body}")]
    Provider {
        /// Provider that failed.
        provider: ProviderKind,
        /// HTTP status code.
        status: u16,
        /// Body snippet, truncated to 200 characters.
        body: String,
    },

    /// The provider returned 2xx but the body did not parse as expected.
    #[error("unexpected response from {provider}: {message}")]
    InvalidResponse {
        /// Provider that responded.
        provider: ProviderKind,
        /// What failed to parse.
        message: String,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GenerateError {
    /// Builds a [`GenerateError::Provider`] from a response status and body,
    /// truncating the body to a short snippet.
    pub fn from_response(provider: ProviderKind, status: u16, body: &str) -> Self {
        let snippet: String = body.chars().take(BODY_SNIPPET_MAX).collect();
        Self::Provider {
            provider,
            status,
            body: snippet,
        }
    }

    /// Classifies the error for the fallback decision.
    ///
    /// Classification is structural: it looks only at the status code and
    /// error kind, never at message text.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Provider { status: 429, .. } => ErrorClass::QuotaOrRateLimit,
            Self::Provider {
                status: 500 | 502 | 503 | 504,
                ..
            } => ErrorClass::Transient,
            Self::Http(_) => ErrorClass::Transient,
            _ => ErrorClass::Other,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
