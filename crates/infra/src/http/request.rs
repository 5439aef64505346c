//! Request and response values for [`HttpClient::execute`](super::HttpClient::execute)

use byte_common::{CorrelationId, CORRELATION_HEADER};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Description of one logical outbound call.
///
/// The body is buffered so it can be replayed on every attempt.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) correlation_id: Option<CorrelationId>,
    pub(crate) invalid: Option<String>,
}

impl RequestSpec {
    /// Empty request for `method` on `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            correlation_id: None,
            invalid: None,
        }
    }

    /// `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH path`
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as JSON. A serialization failure surfaces as
    /// `ClientError::InvalidRequest` when the request is executed.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                self.body = Some(bytes);
            }
            Err(err) => self.invalid = Some(format!("failed to encode JSON body: {err}")),
        }
        self
    }

    /// Add a header. `x-correlation-id` is routed to
    /// [`correlation_id`](Self::correlation_id) so a call never carries two ids.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if name.eq_ignore_ascii_case(CORRELATION_HEADER) {
            if let Some(id) = CorrelationId::from_header(Some(value)) {
                self.correlation_id = Some(id);
            }
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.invalid = Some(format!("invalid header '{name}'")),
        }
        self
    }

    /// Append one query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Reuse an existing correlation id instead of generating one.
    #[must_use]
    pub fn correlation_id(mut self, id: impl Into<CorrelationId>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// HTTP method of every attempt.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the client's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Successful response of a logical call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Status of the successful attempt.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Fully buffered response body.
    pub body: Vec<u8>,
    /// Id sent on every attempt of this call
    pub correlation_id: CorrelationId,
    /// Number of transport attempts made, including the successful one
    pub attempts: u32,
}

impl ApiResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of a response header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
