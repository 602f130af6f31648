//! HTTP plumbing shared by the remote backends.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::util::preview;

/// Wait used on 429 responses without a usable `Retry-After` header
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 5;
/// Longest `Retry-After` honoured before retrying anyway
const MAX_RATE_LIMIT_WAIT_SECS: u64 = 30;

/// Retry settings for a backend
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay_ms: u64) -> Self {
        Self {
            attempts,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Why a request did not produce a successful response.
#[derive(Debug)]
pub enum RequestFailure {
    Status { status: StatusCode, body: String },
    Timeout,
    Transport(String),
}

impl RequestFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } if body.trim().is_empty() => write!(f, "HTTP {status}"),
            Self::Status { status, body } => write!(f, "HTTP {status}: {}", preview(body.trim(), 200)),
            Self::Timeout => f.write_str("request timed out"),
            Self::Transport(reason) => f.write_str(reason),
        }
    }
}

/// Build a client with the backend's request timeout.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::HttpClient(e.to_string()))
}

/// Send a request, retrying transport errors, 429 and 5xx responses.
///
/// Other non-success statuses are returned immediately. `make_request` is
/// called once per attempt since a `RequestBuilder` is consumed by `send`.
pub async fn send_with_retry<F>(
    make_request: F,
    policy: RetryPolicy,
    label: &str,
) -> std::result::Result<Response, RequestFailure>
where
    F: Fn() -> RequestBuilder,
{
    let attempts = policy.attempts.max(1);
    let mut last_failure = None;

    for attempt in 0..attempts {
        debug!("{} request attempt {}/{}", label, attempt + 1, attempts);
        let has_next = attempt + 1 < attempts;

        match make_request().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                let wait = rate_limit_wait(
                    response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok()),
                );

                warn!("{} rate limited, retry after {:?}", label, wait);
                last_failure = Some(RequestFailure::Status {
                    status: StatusCode::TOO_MANY_REQUESTS,
                    body: String::new(),
                });

                if has_next {
                    tokio::time::sleep(wait).await;
                }
                continue;
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("{} returned {}: {}", label, status, preview(body.trim(), 200));

                let failure = RequestFailure::Status { status, body };
                if !status.is_server_error() {
                    return Err(failure);
                }
                last_failure = Some(failure);
            }
            Err(e) => {
                warn!("{} request failed: {}", label, e);
                last_failure = Some(if e.is_timeout() {
                    RequestFailure::Timeout
                } else {
                    RequestFailure::Transport(e.to_string())
                });
            }
        }

        if has_next {
            tokio::time::sleep(policy.delay).await;
        }
    }

    error!("{} failed after {} attempts", label, attempts);
    Err(last_failure.unwrap_or_else(|| RequestFailure::Transport("no attempts made".to_string())))
}

/// Wait before retrying a 429 response.
///
/// Only the delay-seconds form of `Retry-After` is read; HTTP dates and
/// missing headers get the default. The wait is capped.
fn rate_limit_wait(retry_after: Option<&str>) -> Duration {
    let secs = retry_after
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS)
        .min(MAX_RATE_LIMIT_WAIT_SECS);
    Duration::from_secs(secs)
}
