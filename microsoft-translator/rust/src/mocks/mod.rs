//! Mock implementations for testing.
//!
//! Provides a mock transport and a mock token provider for unit testing
//! without making real API calls.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::auth::AccessTokenProvider;
use crate::errors::{TranslatorError, TranslatorResult};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Returns the value of a query parameter of the recorded URL.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&self.url).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns the body as UTF-8 text.
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self::with_content_type(200, "application/json", serde_json::to_vec(value).unwrap_or_default())
    }

    /// Creates a successful XML response.
    pub fn xml(body: &str) -> Self {
        Self::with_content_type(200, "application/xml; charset=utf-8", body.as_bytes().to_vec())
    }

    /// Creates a successful binary response.
    pub fn bytes(content_type: &str, body: Vec<u8>) -> Self {
        Self::with_content_type(200, content_type, body)
    }

    /// Creates a plain text response with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        Self::with_content_type(status, "text/plain", body.as_bytes().to_vec())
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    fn with_content_type(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Mock HTTP transport returning queued responses in order.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queues an XML response.
    pub fn queue_xml(&self, body: &str) {
        self.queue(MockResponse::xml(body));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url,
            body: request.body,
            headers: request.headers,
        });

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.default_response.lock().unwrap().clone());

        response
            .map(|r| HttpResponse {
                status: r.status,
                headers: r.headers,
                body: Bytes::from(r.body),
            })
            .ok_or_else(|| TransportError::Connection {
                message: "No mock response available".to_string(),
            })
    }
}

/// Mock token provider counting how often a token was requested.
#[derive(Default)]
pub struct MockAccessTokenProvider {
    token: Mutex<String>,
    calls: Mutex<u32>,
    next_error: Mutex<Option<TranslatorError>>,
}

impl MockAccessTokenProvider {
    /// Creates a provider returning `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(token.into()),
            ..Default::default()
        }
    }

    /// Makes the next call fail with `error`.
    pub fn set_next_error(&self, error: TranslatorError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Number of tokens handed out.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AccessTokenProvider for MockAccessTokenProvider {
    async fn access_token(&self) -> TranslatorResult<String> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }
        *self.calls.lock().unwrap() += 1;
        Ok(self.token.lock().unwrap().clone())
    }
}
