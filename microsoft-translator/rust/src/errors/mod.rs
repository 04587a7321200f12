//! Error types for the Microsoft Translator client.
//!
//! Covers configuration problems, OAuth failures, API errors returned by the
//! translation service, transport failures and malformed payloads.

use thiserror::Error;

/// Result type alias for translator operations.
pub type TranslatorResult<T> = Result<T, TranslatorError>;

/// Maximum number of characters of an error body kept in error messages.
const MAX_ERROR_MESSAGE_LEN: usize = 512;

/// Error type for Microsoft Translator client operations.
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration issue.
        message: String,
    },

    /// The OAuth provider or the API rejected the credentials.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message from the provider.
        message: String,
        /// OAuth error code (`invalid_client`, ...), when the provider sent one.
        error_code: Option<String>,
    },

    /// Caller input rejected before any request was made.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation issue.
        message: String,
        /// The offending parameter.
        param: Option<String>,
    },

    /// Non-success response from the translation API.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Connection-level failure.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The request timed out.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// JSON decoding failure.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Malformed or unexpected XML.
    #[error("XML error: {message}")]
    Xml {
        /// Error message.
        message: String,
    },

    /// Well-formed response whose content does not match the request.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Error message.
        message: String,
    },

    /// Access token cache failure.
    #[error("Token cache error: {message}")]
    Cache {
        /// Error message.
        message: String,
    },
}

impl TranslatorError {
    /// Stable error code for logs and telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "TRANSLATOR_CONFIG",
            Self::Authentication { .. } => "TRANSLATOR_AUTH",
            Self::Validation { .. } => "TRANSLATOR_VALIDATION",
            Self::Api { .. } => "TRANSLATOR_API",
            Self::Network { .. } => "TRANSLATOR_NETWORK",
            Self::Timeout { .. } => "TRANSLATOR_TIMEOUT",
            Self::Serialization { .. } => "TRANSLATOR_SERIALIZATION",
            Self::Xml { .. } => "TRANSLATOR_XML",
            Self::UnexpectedResponse { .. } => "TRANSLATOR_UNEXPECTED_RESPONSE",
            Self::Cache { .. } => "TRANSLATOR_CACHE",
        }
    }

    /// Returns true if a caller could reasonably retry the operation.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Api { status: 500..=504, .. }
        )
    }

    /// Creates a validation error for a parameter.
    pub fn validation(message: impl Into<String>, param: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    /// Creates an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Maps a non-success API response to an error.
    ///
    /// The service answers failures with an HTML page or a serialized
    /// exception; markup is stripped and the text truncated.
    pub fn from_api_response(status: u16, body: &[u8]) -> Self {
        let message = summarize_body(&String::from_utf8_lossy(body));
        let message = if message.is_empty() {
            format!("HTTP error: {}", status)
        } else {
            message
        };

        match status {
            401 | 403 => Self::Authentication {
                message,
                error_code: None,
            },
            _ => Self::Api { status, message },
        }
    }
}

/// Error body returned by the OAuth token endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct OAuthErrorResponse {
    /// OAuth error code.
    pub error: String,
    /// Human-readable description.
    pub error_description: Option<String>,
}

impl From<OAuthErrorResponse> for TranslatorError {
    fn from(response: OAuthErrorResponse) -> Self {
        TranslatorError::Authentication {
            message: response
                .error_description
                .unwrap_or_else(|| response.error.clone()),
            error_code: Some(response.error),
        }
    }
}

impl From<serde_json::Error> for TranslatorError {
    fn from(err: serde_json::Error) -> Self {
        TranslatorError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for TranslatorError {
    fn from(err: quick_xml::Error) -> Self {
        TranslatorError::Xml {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for TranslatorError {
    fn from(err: url::ParseError) -> Self {
        TranslatorError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

/// Strips tags, collapses whitespace and truncates an error body.
fn summarize_body(body: &str) -> String {
    let mut text = String::with_capacity(body.len().min(MAX_ERROR_MESSAGE_LEN));
    let mut in_tag = false;
    let mut last_was_space = true;

    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                if !last_was_space {
                    text.push(' ');
                    last_was_space = true;
                }
            }
            _ if in_tag => {}
            c if c.is_whitespace() => {
                if !last_was_space {
                    text.push(' ');
                    last_was_space = true;
                }
            }
            c => {
                text.push(c);
                last_was_space = false;
            }
        }
    }

    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
