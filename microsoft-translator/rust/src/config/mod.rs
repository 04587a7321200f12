//! Configuration module for the Microsoft Translator client.
//!
//! Holds the OAuth client credentials, service endpoints and timeouts.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{TranslatorError, TranslatorResult};

/// Default base URL of the translator HTTP API.
pub const DEFAULT_BASE_URL: &str = "http://api.microsofttranslator.com/V2/Http.svc";

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str =
    "https://datamarket.accesscontrol.windows.net/v2/OAuth2-13";

/// Default OAuth scope granting access to the translator API.
pub const DEFAULT_SCOPE: &str = "http://api.microsofttranslator.com";

/// Default OAuth grant type.
pub const DEFAULT_GRANT_TYPE: &str = "client_credentials";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default margin before the real expiry at which a token counts as expired.
pub const DEFAULT_TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "MICROSOFT_OAUTH_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "MICROSOFT_OAUTH_CLIENT_SECRET";

/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "MICROSOFT_TRANSLATOR_BASE_URL";

/// Environment variable overriding the OAuth token endpoint.
pub const ENV_TOKEN_ENDPOINT: &str = "MICROSOFT_OAUTH_TOKEN_ENDPOINT";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT: &str = "MICROSOFT_TRANSLATOR_TIMEOUT";

/// Configuration for the Microsoft Translator client.
#[derive(Clone)]
pub struct TranslatorConfig {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret (stored securely).
    pub(crate) client_secret: SecretString,
    /// Base URL of the translator API.
    pub base_url: String,
    /// OAuth token endpoint.
    pub token_endpoint: String,
    /// OAuth scope.
    pub scope: String,
    /// OAuth grant type.
    pub grant_type: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Tokens count as expired this long before their real expiry.
    pub token_expiry_margin: Duration,
}

impl TranslatorConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MICROSOFT_OAUTH_CLIENT_ID` (required)
    /// - `MICROSOFT_OAUTH_CLIENT_SECRET` (required)
    /// - `MICROSOFT_TRANSLATOR_BASE_URL` (optional)
    /// - `MICROSOFT_OAUTH_TOKEN_ENDPOINT` (optional)
    /// - `MICROSOFT_TRANSLATOR_TIMEOUT` (optional, seconds)
    pub fn from_env() -> TranslatorResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TranslatorResult<Self> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| TranslatorError::Configuration {
                message: format!("{} environment variable not set", name),
            })
        };

        let mut builder = TranslatorConfigBuilder::new()
            .client_id(require(ENV_CLIENT_ID)?)
            .client_secret(require(ENV_CLIENT_SECRET)?);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }

        if let Some(token_endpoint) = lookup(ENV_TOKEN_ENDPOINT) {
            builder = builder.token_endpoint(token_endpoint);
        }

        if let Some(timeout_str) = lookup(ENV_TIMEOUT) {
            match timeout_str.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => builder = builder.timeout(Duration::from_secs(secs)),
                _ => tracing::warn!(
                    value = %timeout_str,
                    "Ignoring invalid {}",
                    ENV_TIMEOUT
                ),
            }
        }

        builder.build()
    }

    /// Returns the client secret (exposing the secret).
    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Returns a hint of the client id (last 4 characters) for debugging.
    pub fn client_id_hint(&self) -> String {
        let id = &self.client_id;
        match id.char_indices().rev().nth(3) {
            Some((idx, _)) if id.chars().count() > 4 => format!("...{}", &id[idx..]),
            _ => "****".to_string(),
        }
    }
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("client_id", &self.client_id_hint())
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("token_endpoint", &self.token_endpoint)
            .field("scope", &self.scope)
            .field("grant_type", &self.grant_type)
            .field("timeout", &self.timeout)
            .field("token_expiry_margin", &self.token_expiry_margin)
            .finish()
    }
}

/// Builder for `TranslatorConfig`.
#[derive(Default)]
pub struct TranslatorConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: Option<String>,
    token_endpoint: Option<String>,
    scope: Option<String>,
    grant_type: Option<String>,
    timeout: Option<Duration>,
    token_expiry_margin: Option<Duration>,
}

impl TranslatorConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the OAuth client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the OAuth token endpoint.
    pub fn token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(token_endpoint.into());
        self
    }

    /// Sets the OAuth scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the OAuth grant type.
    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the token expiry margin.
    pub fn token_expiry_margin(mut self, margin: Duration) -> Self {
        self.token_expiry_margin = Some(margin);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> TranslatorResult<TranslatorConfig> {
        let client_id = non_empty(self.client_id, "client id")?;
        let client_secret = non_empty(self.client_secret, "client secret")?;

        let base_url = validate_url(
            self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            "Base URL",
        )?;
        let token_endpoint = validate_url(
            self.token_endpoint
                .unwrap_or_else(|| DEFAULT_TOKEN_ENDPOINT.to_string()),
            "Token endpoint",
        )?;

        Ok(TranslatorConfig {
            client_id,
            client_secret: SecretString::new(client_secret),
            base_url,
            token_endpoint,
            scope: self.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            grant_type: self
                .grant_type
                .unwrap_or_else(|| DEFAULT_GRANT_TYPE.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            token_expiry_margin: self
                .token_expiry_margin
                .unwrap_or(DEFAULT_TOKEN_EXPIRY_MARGIN),
        })
    }
}

fn non_empty(value: Option<String>, what: &str) -> TranslatorResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(TranslatorError::Configuration {
            message: format!("OAuth {} cannot be empty", what),
        }),
        None => Err(TranslatorError::Configuration {
            message: format!("OAuth {} is required", what),
        }),
    }
}

fn validate_url(url: String, what: &str) -> TranslatorResult<String> {
    let url = url.trim_end_matches('/').to_string();
    let parsed = url::Url::parse(&url)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TranslatorError::Configuration {
            message: format!("{} must use HTTP or HTTPS", what),
        });
    }

    Ok(url)
}
