//! Opt-in exponential backoff around any transport.
//!
//! Providers never retry on their own. Callers that want retries wrap one:
//!
//! ```text
//! Request → [RetryTransport] → [HttpProvider]
//! ```
//!
//! Only transient failures ([`Web3Error::is_retryable`]) are repeated. RPC
//! error objects, malformed responses and malformed values pass straight
//! through on the first attempt.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Web3Error;
use crate::request::{JsonRpcRequest, JsonRpcResponse, RequestIds};
use crate::transport::RpcTransport;

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    pub max_retries: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Maximum backoff delay (caps exponential growth).
    pub max_backoff: Duration,
    /// Multiplier applied to backoff on each retry.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Stateless retry policy: computes the next delay given the attempt number.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the delay before the `attempt`-th retry (1-based).
    /// Returns `None` if `attempt` exceeds `max_retries`.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.config.max_retries {
            return None;
        }
        let base_ms = self.config.initial_backoff.as_millis() as f64
            * self.config.multiplier.powi((attempt - 1) as i32);
        let cap_ms = self.config.max_backoff.as_millis() as f64;
        Some(Duration::from_millis(base_ms.min(cap_ms) as u64))
    }
}

/// Wraps a transport and repeats transient failures with backoff.
///
/// A retried request is re-sent with its original id, so the id contract of
/// the inner provider still holds: the id is in flight until one attempt
/// produces a response.
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: RpcTransport> RetryTransport<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self {
            inner,
            policy: RetryPolicy::new(config),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: RpcTransport> RpcTransport for RetryTransport<T> {
    fn ids(&self) -> &RequestIds {
        self.inner.ids()
    }

    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, Web3Error> {
        let mut attempt = 0u32;
        loop {
            match self.inner.send(req.clone()).await {
                Err(e) if e.is_retryable() => {
                    attempt += 1;
                    match self.policy.next_delay(attempt) {
                        Some(delay) => {
                            tracing::warn!(
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                method = %req.method,
                                url = %self.inner.url(),
                                "retrying request"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            tracing::error!(
                                attempt,
                                error = %e,
                                method = %req.method,
                                url = %self.inner.url(),
                                "max retries exceeded"
                            );
                            return Err(e);
                        }
                    }
                }
                other => return other,
            }
        }
    }

    fn url(&self) -> &str {
        self.inner.url()
    }
}
