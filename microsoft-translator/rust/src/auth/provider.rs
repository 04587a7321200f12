//! Access token providers.
//!
//! `OAuthAccessTokenProvider` implements the client-credentials grant against
//! the OAuth token endpoint and reuses cached tokens while they are valid.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::cache::{cache_key, AccessTokenCache};
use crate::auth::token::{AccessToken, TokenResponse};
use crate::config::TranslatorConfig;
use crate::errors::{OAuthErrorResponse, TranslatorError, TranslatorResult};
use crate::transport::{HttpRequest, HttpTransport};

/// Supplies bearer tokens for API requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a valid access token.
    async fn access_token(&self) -> TranslatorResult<String>;

    /// Drops any cached token so the next call fetches a new one.
    async fn invalidate(&self) -> TranslatorResult<()> {
        Ok(())
    }
}

/// Client-credentials access token provider.
pub struct OAuthAccessTokenProvider {
    transport: Arc<dyn HttpTransport>,
    token_endpoint: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    grant_type: String,
    timeout: Duration,
    expiry_margin: Duration,
    cache: Option<Arc<dyn AccessTokenCache>>,
}

impl OAuthAccessTokenProvider {
    /// Creates a provider from the client configuration, without a cache.
    pub fn new(config: &TranslatorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: SecretString::new(config.client_secret().to_string()),
            scope: config.scope.clone(),
            grant_type: config.grant_type.clone(),
            timeout: config.timeout,
            expiry_margin: config.token_expiry_margin,
            cache: None,
        }
    }

    /// Attaches a token cache.
    pub fn with_cache(mut self, cache: Arc<dyn AccessTokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Key under which this provider's tokens are cached.
    pub fn cache_key(&self) -> String {
        cache_key(
            &self.client_id,
            self.client_secret.expose_secret(),
            &self.scope,
            &self.grant_type,
        )
    }

    fn build_request_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", &self.grant_type)
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", self.client_secret.expose_secret())
            .append_pair("scope", &self.scope)
            .finish()
    }

    /// Requests a new token from the token endpoint.
    #[instrument(skip(self), fields(endpoint = %self.token_endpoint))]
    pub async fn request_token(&self) -> TranslatorResult<AccessToken> {
        let request = HttpRequest::post(&self.token_endpoint)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_header("Accept", "application/json")
            .with_body(self.build_request_body())
            .with_timeout(self.timeout);

        let issued_at = Utc::now();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Token request rejected");
            return Err(
                match serde_json::from_slice::<OAuthErrorResponse>(&response.body) {
                    Ok(error) => error.into(),
                    Err(_) => TranslatorError::Authentication {
                        message: format!("Token endpoint returned HTTP {}", response.status),
                        error_code: None,
                    },
                },
            );
        }

        let token_response: TokenResponse = serde_json::from_slice(&response.body)?;
        tracing::debug!(expires_in = token_response.expires_in, "Access token issued");

        Ok(token_response.into_access_token(issued_at))
    }
}

#[async_trait]
impl AccessTokenProvider for OAuthAccessTokenProvider {
    async fn access_token(&self) -> TranslatorResult<String> {
        let Some(cache) = &self.cache else {
            return Ok(self.request_token().await?.token);
        };

        let key = self.cache_key();
        if let Some(token) = cache.get(&key).await? {
            if !token.is_expired(self.expiry_margin) {
                tracing::debug!(
                    remaining_secs = token.remaining().as_secs(),
                    "Using cached access token"
                );
                return Ok(token.token);
            }
        }

        tracing::debug!("No usable cached access token");
        let token = self.request_token().await?;
        cache.put(&key, token.clone()).await?;

        Ok(token.token)
    }

    async fn invalidate(&self) -> TranslatorResult<()> {
        if let Some(cache) = &self.cache {
            cache.remove(&self.cache_key()).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for OAuthAccessTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthAccessTokenProvider")
            .field("token_endpoint", &self.token_endpoint)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

/// Provider returning a fixed token.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Creates a provider for an already obtained token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> TranslatorResult<String> {
        Ok(self.token.expose_secret().clone())
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cache::InMemoryAccessTokenCache;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::transport::HttpMethod;
    use pretty_assertions::assert_eq;

    fn test_config() -> TranslatorConfig {
        TranslatorConfig::builder()
            .client_id("my client")
            .client_secret("p@ss&word")
            .token_endpoint("https://auth.example.com/token")
            .build()
            .unwrap()
    }

    fn token_json(token: &str, expires_in: &str) -> serde_json::Value {
        serde_json::json!({
            "token_type": "http://schemas.xmlsoap.org/ws/2009/11/swt-token-profile-1.0",
            "access_token": token,
            "expires_in": expires_in,
            "scope": "http://api.microsofttranslator.com"
        })
    }

    #[tokio::test]
    async fn test_request_token_sends_form() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&token_json("token-1", "600")));

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport.clone());
        let token = provider.access_token().await.unwrap();
        assert_eq!(token, "token-1");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://auth.example.com/token");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert_eq!(
            body,
            "grant_type=client_credentials&client_id=my+client\
&client_secret=p%40ss%26word&scope=http%3A%2F%2Fapi.microsofttranslator.com"
        );
    }

    #[tokio::test]
    async fn test_without_cache_every_call_fetches() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&token_json("token-1", "600")));
        transport.queue(MockResponse::json(&token_json("token-2", "600")));

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport.clone());
        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        assert_eq!(provider.access_token().await.unwrap(), "token-2");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&token_json("token-1", "600")));

        let cache = Arc::new(InMemoryAccessTokenCache::new());
        let provider = OAuthAccessTokenProvider::new(&test_config(), transport.clone())
            .with_cache(cache.clone());

        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        assert_eq!(transport.request_count(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_token_within_margin_is_refreshed() {
        let transport = Arc::new(MockTransport::new());
        // Shorter than the default 10 second margin.
        transport.queue(MockResponse::json(&token_json("short-lived", "5")));
        transport.queue(MockResponse::json(&token_json("fresh", "600")));

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport.clone())
            .with_cache(Arc::new(InMemoryAccessTokenCache::new()));

        assert_eq!(provider.access_token().await.unwrap(), "short-lived");
        assert_eq!(provider.access_token().await.unwrap(), "fresh");
        assert_eq!(provider.access_token().await.unwrap(), "fresh");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_token() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&token_json("token-1", "600")));
        transport.queue(MockResponse::json(&token_json("token-2", "600")));

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport.clone())
            .with_cache(Arc::new(InMemoryAccessTokenCache::new()));

        assert_eq!(provider.access_token().await.unwrap(), "token-1");
        provider.invalidate().await.unwrap();
        assert_eq!(provider.access_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_shared_cache_separates_credentials() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&token_json("token-a", "600")));
        transport.queue(MockResponse::json(&token_json("token-b", "600")));

        let cache: Arc<dyn AccessTokenCache> = Arc::new(InMemoryAccessTokenCache::new());
        let other_config = TranslatorConfig::builder()
            .client_id("other client")
            .client_secret("other secret")
            .build()
            .unwrap();

        let a = OAuthAccessTokenProvider::new(&test_config(), transport.clone())
            .with_cache(cache.clone());
        let b = OAuthAccessTokenProvider::new(&other_config, transport.clone())
            .with_cache(cache.clone());

        assert_eq!(a.access_token().await.unwrap(), "token-a");
        assert_eq!(b.access_token().await.unwrap(), "token-b");
        assert_eq!(a.access_token().await.unwrap(), "token-a");
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[tokio::test]
    async fn test_oauth_error_response() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(
            MockResponse::json(&serde_json::json!({
                "error": "invalid_client",
                "error_description": "ACS50012: Authentication failed."
            }))
            .with_status(400),
        );

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport);
        match provider.access_token().await {
            Err(TranslatorError::Authentication { error_code, .. }) => {
                assert_eq!(error_code.as_deref(), Some("invalid_client"));
            }
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_response() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::text(503, "Service Unavailable"));

        let provider = OAuthAccessTokenProvider::new(&test_config(), transport);
        let error = provider.access_token().await.unwrap_err();
        assert!(error.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("fixed");
        assert_eq!(provider.access_token().await.unwrap(), "fixed");
        provider.invalidate().await.unwrap();
        assert!(!format!("{:?}", provider).contains("fixed"));
    }
}
