//! Shared provider client error types
//!
//! Common error enum and utilities used by both HTTP clients (Consumet,
//! AniList), plus the conversions into the core crate's boundary errors.

use anistream_core::catalog::CatalogError;
use anistream_core::provider::ProviderError;
use thiserror::Error;

/// Maximum response body size for upstream HTTP calls (16 MB).
/// Prevents OOM from malicious or misconfigured upstream servers.
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Common error type for the HTTP clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(ClientError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(ClientError::ResponseTooLarge {
            size: bytes.len() as u64,
        });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ClientError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) => Self::Network(msg),
            ClientError::Http { status, url } => Self::Http {
                status: status.as_u16(),
                url,
            },
            ClientError::Api(msg) => Self::Api(msg),
            ClientError::Parse(msg) => Self::Parse(msg),
            ClientError::ResponseTooLarge { size } => Self::ResponseTooLarge { size },
        }
    }
}

impl From<ClientError> for CatalogError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) => Self::Network(msg),
            ClientError::Http { status, .. } => Self::Http(status.as_u16()),
            ClientError::Api(msg) => Self::Api(msg),
            ClientError::Parse(msg) => Self::Parse(msg),
            ClientError::ResponseTooLarge { size } => {
                Self::Parse(format!("response too large ({size} bytes)"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_http() {
        let err = ClientError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://api.example.com/info".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error 404 Not Found for https://api.example.com/info"
        );
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = ClientError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn test_provider_error_conversion_keeps_transience() {
        let err: ProviderError = ClientError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "https://api.example.com/watch".to_string(),
        }
        .into();
        assert!(matches!(err, ProviderError::Http { status: 502, .. }));

        let err: ProviderError = ClientError::Parse("unexpected EOF".to_string()).into();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let err: CatalogError = ClientError::Http {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            url: "https://graphql.example.com".to_string(),
        }
        .into();
        assert!(matches!(err, CatalogError::Http(429)));
    }
}
