//! Provider error types
//!
//! Errors from a single provider call attempt, with a transient/permanent
//! classification gating the retry wrapper.

use crate::resolve::TransientError;

/// Error from one attempt against a provider endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response too large ({size} bytes)")]
    ResponseTooLarge { size: u64 },
}

impl ProviderError {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Connection-level failures and server-side HTTP statuses are
    /// transient; malformed responses, oversized bodies, client-side HTTP
    /// statuses and well-formed API refusals are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Api(_) | Self::Parse(_) | Self::ResponseTooLarge { .. } => false,
        }
    }
}

impl TransientError for ProviderError {
    fn is_transient(&self) -> bool {
        Self::is_transient(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_is_transient() {
        assert!(ProviderError::Network("connection refused".to_string()).is_transient());
    }

    #[test]
    fn test_http_classification() {
        let server = ProviderError::Http {
            status: 503,
            url: "https://api.example.com/info".to_string(),
        };
        assert!(server.is_transient());

        let throttled = ProviderError::Http {
            status: 429,
            url: "https://api.example.com/info".to_string(),
        };
        assert!(throttled.is_transient());

        let not_found = ProviderError::Http {
            status: 404,
            url: "https://api.example.com/info".to_string(),
        };
        assert!(!not_found.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!ProviderError::Parse("unexpected EOF".to_string()).is_transient());
        assert!(!ProviderError::Api("episode not found".to_string()).is_transient());
        assert!(!ProviderError::ResponseTooLarge { size: 20_000_000 }.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Http {
            status: 502,
            url: "https://api.example.com/watch".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error 502 for https://api.example.com/watch"
        );
    }
}
