//! Error types for the reader API client.
//!
//! # Design
//! Failures are not classified per endpoint. A call either fails in the
//! transport (`Network`), fails to decode (`Deserialization`), or comes back
//! with a non-2xx status (`NotFound` / `Http`). An envelope with
//! `success: false` inside a 2xx response is *not* an error at this layer.

use thiserror::Error;

/// Errors returned by the reader client, its transport and its factory.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Timeout, refused connection, DNS or TLS failure.
    #[error("network error: {0}")]
    Network(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the declared shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid client configuration: {0}")]
    Configuration(String),

    #[error("reader client has already been initialized")]
    AlreadyInitialized,

    #[error("reader client has not been initialized")]
    NotInitialized,
}

impl ApiError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The envelope `message` from an error response body, when the server
    /// sent one.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_reads_envelope_message() {
        let err = ApiError::Http {
            status: 401,
            body: r#"{"success":false,"message":"Token missing"}"#.to_string(),
        };
        assert_eq!(err.server_message().as_deref(), Some("Token missing"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn server_message_is_none_for_plain_text_body() {
        let err = ApiError::Http {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert!(err.server_message().is_none());
    }

    #[test]
    fn network_error_has_no_status() {
        let err = ApiError::Network("connection refused".to_string());
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
