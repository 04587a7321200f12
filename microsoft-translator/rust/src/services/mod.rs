//! Service implementations for the translator API.
//!
//! Each service groups related remote operations; all of them share one
//! `ApiExecutor` that authenticates, sends and checks every request.

mod detection;
mod languages;
mod speech;
mod translation;

pub use detection::DetectionService;
pub use languages::LanguagesService;
pub use speech::SpeechService;
pub use translation::TranslationService;

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AccessTokenProvider;
use crate::errors::{TranslatorError, TranslatorResult};
use crate::observability::RequestTimer;
use crate::transport::{HttpRequest, HttpTransport};

/// Content type of XML request bodies.
const XML_CONTENT_TYPE: &str = "text/xml";

/// Sends authenticated requests to the translator API.
pub(crate) struct ApiExecutor {
    base_url: String,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
    token_provider: Arc<dyn AccessTokenProvider>,
}

impl ApiExecutor {
    pub(crate) fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        transport: Arc<dyn HttpTransport>,
        token_provider: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            transport,
            token_provider,
        }
    }

    /// Builds the URL of an operation with its query parameters.
    fn url(&self, operation: &str, params: &[(&str, &str)]) -> TranslatorResult<String> {
        let mut url = url::Url::parse(&format!("{}/{}", self.base_url, operation))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url.into())
    }

    /// Issues a GET request and returns the response body.
    pub(crate) async fn get(
        &self,
        operation: &'static str,
        params: &[(&str, &str)],
    ) -> TranslatorResult<Bytes> {
        let request = HttpRequest::get(self.url(operation, params)?);
        self.execute(operation, request).await
    }

    /// Issues a POST request with an XML body and returns the response body.
    pub(crate) async fn post_xml(
        &self,
        operation: &'static str,
        params: &[(&str, &str)],
        body: String,
    ) -> TranslatorResult<Bytes> {
        let request = HttpRequest::post(self.url(operation, params)?)
            .with_header("Content-Type", XML_CONTENT_TYPE)
            .with_body(body);
        self.execute(operation, request).await
    }

    async fn execute(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> TranslatorResult<Bytes> {
        let token = self.token_provider.access_token().await?;
        let request = request
            .with_header("Authorization", format!("Bearer {}", token))
            .with_timeout(self.timeout);

        let timer = RequestTimer::start(operation);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let error = TranslatorError::from_api_response(response.status, &response.body);
            tracing::warn!(
                operation = timer.operation(),
                status = response.status,
                elapsed_ms = timer.elapsed_ms(),
                error_code = error.error_code(),
                "Translator request failed"
            );

            // A rejected token must not be served from the cache again.
            if matches!(error, TranslatorError::Authentication { .. }) {
                if let Err(e) = self.token_provider.invalidate().await {
                    tracing::warn!(error = %e, "Failed to invalidate access token");
                }
            }
            return Err(error);
        }

        tracing::debug!(
            operation = timer.operation(),
            elapsed_ms = timer.elapsed_ms(),
            bytes = response.body.len(),
            "Translator request completed"
        );

        Ok(response.body)
    }
}

impl std::fmt::Debug for ApiExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiExecutor")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Decodes an XML response body.
pub(crate) fn xml_body(body: &Bytes) -> TranslatorResult<&str> {
    std::str::from_utf8(body)
        .map(|s| s.trim_start_matches('\u{feff}'))
        .map_err(|e| TranslatorError::xml(format!("Response is not UTF-8: {}", e)))
}

/// Rejects empty text parameters.
pub(crate) fn require_text(value: &str, param: &str) -> TranslatorResult<()> {
    if value.trim().is_empty() {
        return Err(TranslatorError::validation(
            format!("{} cannot be empty", param),
            param,
        ));
    }
    Ok(())
}

/// Rejects empty lists and lists with empty entries.
pub(crate) fn require_items<S: AsRef<str>>(items: &[S], param: &str) -> TranslatorResult<()> {
    if items.is_empty() {
        return Err(TranslatorError::validation(
            format!("{} cannot be empty", param),
            param,
        ));
    }
    if let Some(index) = items.iter().position(|s| s.as_ref().trim().is_empty()) {
        return Err(TranslatorError::validation(
            format!("{}[{}] cannot be empty", param, index),
            param,
        ));
    }
    Ok(())
}

/// Checks that a batch result has one entry per input.
pub(crate) fn require_same_len<T>(
    results: Vec<T>,
    expected: usize,
    operation: &str,
) -> TranslatorResult<Vec<T>> {
    if results.len() != expected {
        return Err(TranslatorError::UnexpectedResponse {
            message: format!(
                "{} returned {} results for {} inputs",
                operation,
                results.len(),
                expected
            ),
        });
    }
    Ok(results)
}
