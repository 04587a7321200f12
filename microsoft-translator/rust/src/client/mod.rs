//! Microsoft Translator client.
//!
//! Provides the main client interface for the translator HTTP API.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    AccessTokenCache, AccessTokenProvider, InMemoryAccessTokenCache, OAuthAccessTokenProvider,
};
use crate::config::{TranslatorConfig, TranslatorConfigBuilder};
use crate::errors::{TranslatorError, TranslatorResult};
use crate::services::{
    ApiExecutor, DetectionService, LanguagesService, SpeechService, TranslationService,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{AudioFormat, SpeakOptions, TranslateOptions};

/// The main translator client.
///
/// Every call is authenticated with an OAuth access token; tokens are cached
/// and reused until shortly before they expire.
///
/// # Example
///
/// ```rust,no_run
/// use microsoft_translator::MicrosoftTranslator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let translator = MicrosoftTranslator::builder()
///         .client_id("my-client-id")
///         .client_secret("my-client-secret")
///         .build()?;
///
///     let dutch = translator.translate("This is a test", "nl", Some("en")).await?;
///     println!("{}", dutch);
///     Ok(())
/// }
/// ```
pub struct MicrosoftTranslator {
    config: TranslatorConfig,
    translation_service: TranslationService,
    detection_service: DetectionService,
    speech_service: SpeechService,
    languages_service: LanguagesService,
}

impl MicrosoftTranslator {
    /// Creates a new client builder.
    pub fn builder() -> MicrosoftTranslatorBuilder {
        MicrosoftTranslatorBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`TranslatorConfig::from_env`] for the variables read.
    pub fn from_env() -> TranslatorResult<Self> {
        let config = TranslatorConfig::from_env()?;
        MicrosoftTranslatorBuilder::from_config(config).build()
    }

    /// Returns the translation service.
    pub fn translation(&self) -> &TranslationService {
        &self.translation_service
    }

    /// Returns the detection service.
    pub fn detection(&self) -> &DetectionService {
        &self.detection_service
    }

    /// Returns the speech service.
    pub fn speech(&self) -> &SpeechService {
        &self.speech_service
    }

    /// Returns the languages service.
    pub fn languages(&self) -> &LanguagesService {
        &self.languages_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates `text` into `to`; `None` for `from` auto-detects the source.
    pub async fn translate(
        &self,
        text: &str,
        to: &str,
        from: Option<&str>,
    ) -> TranslatorResult<String> {
        self.translation_service.translate(text, to, from).await
    }

    /// Translates `text` with a category and content type.
    pub async fn translate_with_options(
        &self,
        text: &str,
        to: &str,
        from: Option<&str>,
        options: &TranslateOptions,
    ) -> TranslatorResult<String> {
        self.translation_service
            .translate_with_options(text, to, from, options)
            .await
    }

    /// Translates a batch of texts, preserving order.
    pub async fn translate_array<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        to: &str,
        from: Option<&str>,
    ) -> TranslatorResult<Vec<String>> {
        self.translation_service
            .translate_array(texts, to, from)
            .await
    }

    /// Translates a batch of texts with a category and content type.
    pub async fn translate_array_with_options<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        to: &str,
        from: Option<&str>,
        options: &TranslateOptions,
    ) -> TranslatorResult<Vec<String>> {
        self.translation_service
            .translate_array_with_options(texts, to, from, options)
            .await
    }

    /// Detects the language of `text`.
    pub async fn detect(&self, text: &str) -> TranslatorResult<String> {
        self.detection_service.detect(text).await
    }

    /// Detects the language of every text.
    pub async fn detect_array<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> TranslatorResult<Vec<String>> {
        self.detection_service.detect_array(texts).await
    }

    /// Splits `text` into sentences.
    pub async fn break_sentences(
        &self,
        text: &str,
        language: &str,
    ) -> TranslatorResult<Vec<String>> {
        self.detection_service.break_sentences(text, language).await
    }

    /// Synthesizes `text` as speech.
    pub async fn speak(
        &self,
        text: &str,
        language: &str,
        format: AudioFormat,
        options: SpeakOptions,
    ) -> TranslatorResult<Bytes> {
        self.speech_service
            .speak(text, language, format, options)
            .await
    }

    /// Lists the languages supported for speech.
    pub async fn get_languages_for_speak(&self) -> TranslatorResult<Vec<String>> {
        self.speech_service.get_languages_for_speak().await
    }

    /// Lists the languages supported for translation.
    pub async fn get_languages_for_translate(&self) -> TranslatorResult<Vec<String>> {
        self.languages_service.get_languages_for_translate().await
    }

    /// Maps every language code to its name in `locale`.
    pub async fn get_language_names<S: AsRef<str> + Sync>(
        &self,
        codes: &[S],
        locale: &str,
    ) -> TranslatorResult<HashMap<String, String>> {
        self.languages_service
            .get_language_names(codes, locale)
            .await
    }
}

impl std::fmt::Debug for MicrosoftTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrosoftTranslator")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the translator client.
pub struct MicrosoftTranslatorBuilder {
    config_builder: TranslatorConfigBuilder,
    config: Option<TranslatorConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
    token_cache: Option<Arc<dyn AccessTokenCache>>,
}

impl Default for MicrosoftTranslatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrosoftTranslatorBuilder {
    /// Creates a new client builder with an in-memory token cache.
    pub fn new() -> Self {
        Self {
            config_builder: TranslatorConfigBuilder::new(),
            config: None,
            transport: None,
            token_provider: None,
            token_cache: Some(Arc::new(InMemoryAccessTokenCache::new())),
        }
    }

    /// Creates a builder from an existing configuration.
    ///
    /// Configuration setters called afterwards are ignored.
    pub fn from_config(config: TranslatorConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// Sets the OAuth client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.client_id(client_id);
        self
    }

    /// Sets the OAuth client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.client_secret(client_secret);
        self
    }

    /// Sets the base URL of the translator API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the OAuth token endpoint.
    pub fn token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.token_endpoint(token_endpoint);
        self
    }

    /// Sets the OAuth scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.scope(scope);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets how long before expiry a cached token is replaced.
    pub fn token_expiry_margin(mut self, margin: Duration) -> Self {
        self.config_builder = self.config_builder.token_expiry_margin(margin);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom access token provider, bypassing the OAuth flow.
    pub fn token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Sets the cache shared by OAuth token lookups.
    pub fn token_cache(mut self, cache: Arc<dyn AccessTokenCache>) -> Self {
        self.token_cache = Some(cache);
        self
    }

    /// Requests a new token for every call.
    pub fn no_token_cache(mut self) -> Self {
        self.token_cache = None;
        self
    }

    /// Builds the client.
    pub fn build(self) -> TranslatorResult<MicrosoftTranslator> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(config.timeout).map_err(|e| {
                TranslatorError::Configuration {
                    message: e.to_string(),
                }
            })?),
        };

        let token_provider: Arc<dyn AccessTokenProvider> = match self.token_provider {
            Some(provider) => provider,
            None => {
                let provider = OAuthAccessTokenProvider::new(&config, Arc::clone(&transport));
                match self.token_cache {
                    Some(cache) => Arc::new(provider.with_cache(cache)),
                    None => Arc::new(provider),
                }
            }
        };

        let executor = Arc::new(ApiExecutor::new(
            config.base_url.clone(),
            config.timeout,
            transport,
            token_provider,
        ));

        tracing::debug!(
            client_id = %config.client_id_hint(),
            base_url = %config.base_url,
            "Built translator client"
        );

        Ok(MicrosoftTranslator {
            translation_service: TranslationService::new(Arc::clone(&executor)),
            detection_service: DetectionService::new(Arc::clone(&executor)),
            speech_service: SpeechService::new(Arc::clone(&executor)),
            languages_service: LanguagesService::new(executor),
            config,
        })
    }
}

impl std::fmt::Debug for MicrosoftTranslatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrosoftTranslatorBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("custom_token_provider", &self.token_provider.is_some())
            .field("token_cache", &self.token_cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::transport::HttpMethod;

    fn token_json() -> MockResponse {
        MockResponse::json(&serde_json::json!({
            "access_token": "http%3a%2f%2fschemas.xmlsoap.org%2fws%2f2005",
            "token_type": "http://schemas.xmlsoap.org/ws/2009/11/swt-token-profile-1.0",
            "expires_in": "600",
            "scope": "http://api.microsofttranslator.com"
        }))
    }

    fn translator(transport: Arc<MockTransport>) -> MicrosoftTranslator {
        MicrosoftTranslator::builder()
            .client_id("client-id")
            .client_secret("client-secret")
            .base_url("https://api.example.com/V2/Http.svc")
            .token_endpoint("https://auth.example.com/token")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = MicrosoftTranslator::builder().client_id("id").build();
        assert!(matches!(result, Err(TranslatorError::Configuration { .. })));
    }

    #[test]
    fn test_debug_hides_secret() {
        let translator = translator(Arc::new(MockTransport::new()));
        let debug = format!("{:?}", translator);
        assert!(!debug.contains("client-secret"));
    }

    #[tokio::test]
    async fn test_token_fetched_once_for_two_calls() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(token_json());
        transport.queue_xml("<string>en</string>");
        transport.queue_xml("<string>nl</string>");

        let translator = translator(transport.clone());
        assert_eq!(translator.detect("This is a test").await.unwrap(), "en");
        assert_eq!(translator.detect("Dit is een test").await.unwrap(), "nl");

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "https://auth.example.com/token");
        assert!(requests[1].url.contains("/Detect?"));
        assert!(requests[2].url.contains("/Detect?"));
    }

    #[tokio::test]
    async fn test_default_caches_are_per_client() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(token_json());
        transport.queue_xml("<string>en</string>");
        transport.queue(token_json());
        transport.queue_xml("<string>nl</string>");

        let first = translator(transport.clone());
        let second = translator(transport.clone());
        assert_eq!(first.detect("one").await.unwrap(), "en");
        assert_eq!(second.detect("twee").await.unwrap(), "nl");

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[2].url, "https://auth.example.com/token");
    }

    #[tokio::test]
    async fn test_no_token_cache_fetches_every_time() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(token_json());
        transport.queue_xml("<string>en</string>");
        transport.queue(token_json());
        transport.queue_xml("<string>en</string>");

        let translator = MicrosoftTranslator::builder()
            .client_id("client-id")
            .client_secret("client-secret")
            .token_endpoint("https://auth.example.com/token")
            .transport(transport.clone())
            .no_token_cache()
            .build()
            .unwrap();

        translator.detect("one").await.unwrap();
        translator.detect("two").await.unwrap();
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_rejected_token_is_refetched() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(token_json());
        transport.queue(MockResponse::text(401, "Invalid token"));
        transport.queue(token_json());
        transport.queue_xml("<string>en</string>");

        let translator = translator(transport.clone());
        let error = translator.detect("This is a test").await.unwrap_err();
        assert!(matches!(error, TranslatorError::Authentication { .. }));

        assert_eq!(translator.detect("This is a test").await.unwrap(), "en");
        assert_eq!(transport.request_count(), 4);
    }
}
