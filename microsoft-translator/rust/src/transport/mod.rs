//! HTTP transport layer for the Microsoft Translator client.
//!
//! Provides the HTTP transport abstraction used for both the OAuth token
//! endpoint and the translator API, and its reqwest implementation.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

use std::time::Duration;

use crate::errors::TranslatorError;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid request or response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<TransportError> for TranslatorError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => TranslatorError::Timeout {
                message: err.to_string(),
            },
            TransportError::Connection { message } | TransportError::InvalidResponse { message } => {
                TranslatorError::Network { message }
            }
        }
    }
}
