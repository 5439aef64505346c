//! Retrying HTTP client

use std::sync::Arc;
use std::time::Duration;

use byte_common::resilience::constants::DEFAULT_ATTEMPT_TIMEOUT;
use byte_common::{
    CorrelationId, FailureReason, RetryLog, RetryPolicy, RetryPolicyConfig, RetryStats,
    RetryStatsSnapshot, RetryStep, Sleeper, TokioSleeper, TransportOutcome, CORRELATION_HEADER,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, StatusCode, Url};
use tracing::debug;

use super::errors::{ClientError, LastFailure};
use super::request::{ApiResponse, RequestSpec};
use super::transport::TransportFailure;

/// HTTP client with built-in retry, per-attempt timeout, and correlation ids.
///
/// Clones share the connection pool, the retry statistics, and the sleeper.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    stats: Arc<RetryStats>,
    sleeper: Arc<dyn Sleeper>,
}

/// Buffered response of one attempt.
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

enum Attempt {
    Response(RawResponse),
    Failed(TransportFailure),
}

impl Attempt {
    fn outcome(&self) -> TransportOutcome {
        match self {
            Self::Response(raw) => TransportOutcome::Status(raw.status.as_u16()),
            Self::Failed(failure) => TransportOutcome::Failure(failure.kind),
        }
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Base URL every request path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Retry policy applied to every call.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Deadline for a single attempt.
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Shared statistics store for this client and its clones.
    pub fn stats(&self) -> &Arc<RetryStats> {
        &self.stats
    }

    /// Point-in-time copy of the retry counters.
    pub fn retry_stats(&self) -> RetryStatsSnapshot {
        self.stats.snapshot()
    }

    /// Execute one logical call with retry semantics.
    ///
    /// Makes at most `max_attempts` transport attempts, all carrying the same
    /// correlation id. Retryable failures (5xx, connect errors, timeouts) are
    /// retried after the policy's backoff delay; everything else stops the
    /// loop immediately.
    ///
    /// # Errors
    /// - [`ClientError::Status`] for a terminal HTTP status, body verbatim
    /// - [`ClientError::RetriesExhausted`] when every attempt was retryable
    /// - [`ClientError::Transport`] for an unrecognized transport failure
    /// - [`ClientError::InvalidRequest`] when nothing could be sent
    pub async fn execute(
        &self,
        operation: &str,
        spec: RequestSpec,
    ) -> Result<ApiResponse, ClientError> {
        let correlation_id = spec.correlation_id.clone().unwrap_or_else(CorrelationId::generate);
        let url = self.resolve(operation, &spec)?;
        let correlation_header = HeaderValue::from_str(correlation_id.as_str()).map_err(|_| {
            ClientError::InvalidRequest {
                operation: operation.to_owned(),
                message: "correlation id is not a valid header value".into(),
            }
        })?;

        let log = RetryLog::start(operation, correlation_id.as_str(), self.policy.max_attempts());
        let mut attempt: u32 = 1;

        loop {
            debug!(
                operation,
                correlation_id = %correlation_id,
                attempt,
                method = %spec.method,
                %url,
                "sending HTTP request"
            );

            let result = self.send_once(&url, &spec, &correlation_header).await;
            let outcome = result.outcome();
            debug!(operation, correlation_id = %correlation_id, attempt, %outcome, "attempt finished");

            match (self.policy.next_step(attempt, &outcome), result) {
                (RetryStep::Success, Attempt::Response(raw)) => {
                    log.record_success(attempt, raw.status.as_u16());
                    return Ok(ApiResponse {
                        status: raw.status,
                        headers: raw.headers,
                        body: raw.body,
                        correlation_id,
                        attempts: attempt,
                    });
                }
                (RetryStep::Retry { delay }, _) => {
                    self.stats.record_retry(operation);
                    log.record_retry(attempt, delay, &outcome);
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                (step, result) => {
                    let reason = match step {
                        RetryStep::Fail { reason } => reason,
                        _ => FailureReason::Terminal,
                    };
                    self.stats.record_failure();
                    match reason {
                        FailureReason::Exhausted => log.record_exhausted(attempt, &outcome),
                        FailureReason::Terminal => log.record_terminal(attempt, &outcome),
                    }
                    return Err(failure(operation, reason, attempt, result, correlation_id));
                }
            }
        }
    }

    fn resolve(&self, operation: &str, spec: &RequestSpec) -> Result<Url, ClientError> {
        let invalid = |message: String| ClientError::InvalidRequest {
            operation: operation.to_owned(),
            message,
        };

        if let Some(message) = &spec.invalid {
            return Err(invalid(message.clone()));
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            spec.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|err| invalid(format!("bad URL '{joined}': {err}")))?;
        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(spec.query.iter());
        }
        Ok(url)
    }

    async fn send_once(
        &self,
        url: &Url,
        spec: &RequestSpec,
        correlation_header: &HeaderValue,
    ) -> Attempt {
        // One correlation id per call, even if the caller set the header.
        let mut headers = spec.headers.clone();
        headers.remove(CORRELATION_HEADER);
        headers.insert(CORRELATION_HEADER, correlation_header.clone());

        let mut builder =
            self.client.request(spec.method.clone(), url.clone()).headers(headers);
        if let Some(body) = &spec.body {
            builder = builder.body(body.clone());
        }

        // The deadline covers connect, headers, and the full body.
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, headers, body: body.to_vec() })
        };

        match tokio::time::timeout(self.attempt_timeout, exchange).await {
            Ok(Ok(raw)) => Attempt::Response(raw),
            Ok(Err(err)) => Attempt::Failed(TransportFailure::from_reqwest(&err)),
            Err(_) => Attempt::Failed(TransportFailure::timed_out(self.attempt_timeout)),
        }
    }
}

fn failure(
    operation: &str,
    reason: FailureReason,
    attempts: u32,
    result: Attempt,
    correlation_id: CorrelationId,
) -> ClientError {
    let operation = operation.to_owned();
    match (reason, result) {
        (FailureReason::Exhausted, Attempt::Response(raw)) => ClientError::RetriesExhausted {
            operation,
            attempts,
            last: LastFailure::Status {
                status: raw.status.as_u16(),
                body: String::from_utf8_lossy(&raw.body).into_owned(),
            },
            correlation_id,
        },
        (FailureReason::Exhausted, Attempt::Failed(failure)) => ClientError::RetriesExhausted {
            operation,
            attempts,
            last: LastFailure::Transport { kind: failure.kind, message: failure.message },
            correlation_id,
        },
        (FailureReason::Terminal, Attempt::Response(raw)) => ClientError::Status {
            operation,
            status: raw.status.as_u16(),
            body: String::from_utf8_lossy(&raw.body).into_owned(),
            attempts,
            correlation_id,
        },
        (FailureReason::Terminal, Attempt::Failed(failure)) => ClientError::Transport {
            operation,
            kind: failure.kind,
            message: failure.message,
            attempts,
            correlation_id,
        },
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    attempt_timeout: Duration,
    retry: RetryPolicyConfig,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    stats: Option<Arc<RetryStats>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: byte_domain::constants::DEFAULT_API_URL.to_string(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            retry: RetryPolicyConfig::default(),
            user_agent: None,
            default_headers: None,
            stats: None,
            sleeper: None,
        }
    }
}

impl HttpClientBuilder {
    /// Base URL, validated on `build`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Deadline for one attempt, from connect through the last body byte.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Retry configuration, validated on `build`.
    pub fn retry_policy(mut self, config: RetryPolicyConfig) -> Self {
        self.retry = config;
        self
    }

    /// `User-Agent` sent on every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent on every request unless the call sets its own.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Share an existing statistics store instead of creating a new one.
    pub fn stats(mut self, stats: Arc<RetryStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Replace the tokio sleeper used between attempts.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// # Errors
    /// Returns [`ClientError::Config`] for a zero attempt timeout, an invalid
    /// base URL, an invalid retry policy, or a reqwest builder failure.
    pub fn build(self) -> Result<HttpClient, ClientError> {
        if self.attempt_timeout.is_zero() {
            return Err(ClientError::Config("attempt timeout must be greater than zero".into()));
        }
        self.retry.validate().map_err(|err| ClientError::Config(err.to_string()))?;

        let base_url = Url::parse(&self.base_url)
            .map_err(|err| ClientError::Config(format!("invalid base URL '{}': {err}", self.base_url)))?;

        let mut builder =
            ReqwestClient::builder().connect_timeout(self.attempt_timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| ClientError::Config(err.to_string()))?;

        Ok(HttpClient {
            client,
            base_url,
            policy: RetryPolicy::new(self.retry),
            attempt_timeout: self.attempt_timeout,
            stats: self.stats.unwrap_or_default(),
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
        })
    }
}
