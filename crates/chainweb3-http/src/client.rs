//! HTTP JSON-RPC provider backed by `reqwest`.
//!
//! One request is one POST. The provider never retries; wrap it in
//! [`RetryTransport`](chainweb3_core::RetryTransport) for that.

use async_trait::async_trait;
use std::time::Duration;

use chainweb3_core::error::Web3Error;
use chainweb3_core::request::{JsonRpcRequest, JsonRpcResponse, RequestIds, RpcId};
use chainweb3_core::transport::RpcTransport;

/// Scheme prefixed to hosts given without one.
pub const DEFAULT_SCHEME: &str = "http://";

/// Configuration for `HttpProvider`.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Upper bound for a whole request, connect to last body byte.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("chainweb3/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Prefix `http://` to a bare host such as `localhost:8545`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{host}")
    }
}

/// JSON-RPC provider speaking HTTP POST.
pub struct HttpProvider {
    url: String,
    http: reqwest::Client,
    ids: RequestIds,
    request_timeout: Duration,
}

impl HttpProvider {
    /// Create a provider for `host`; a bare host gets the default scheme.
    pub fn new(host: &str, config: HttpProviderConfig) -> Result<Self, Web3Error> {
        let url = normalize_host(host);
        reqwest::Url::parse(&url).map_err(|e| Web3Error::InvalidUrl(format!("{url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Web3Error::Client(e.to_string()))?;

        Ok(Self {
            url,
            http,
            ids: RequestIds::new(),
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn connect(host: &str) -> Result<Self, Web3Error> {
        Self::new(host, HttpProviderConfig::default())
    }

    fn transport_error(&self, e: reqwest::Error) -> Web3Error {
        if e.is_timeout() {
            Web3Error::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            Web3Error::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl RpcTransport for HttpProvider {
    fn ids(&self) -> &RequestIds {
        &self.ids
    }

    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, Web3Error> {
        tracing::debug!(method = %req.method, id = %req.id, url = %self.url, "sending request");

        let resp = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(req.to_bytes())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;

        // JSON-RPC errors may arrive with any status; the body decides.
        if let Some(parsed) = JsonRpcResponse::parse(&body) {
            tracing::debug!(
                method = %req.method,
                id = %parsed.id,
                status = status.as_u16(),
                ok = parsed.is_ok(),
                "response received"
            );
            // A node that cannot parse the request reports the error with a null id.
            let unattributed_error = parsed.id == RpcId::Null && !parsed.is_ok();
            if parsed.id != req.id && !unattributed_error {
                tracing::warn!(method = %req.method, sent = %req.id, got = %parsed.id, "response id mismatch");
                return Err(Web3Error::MalformedResponse {
                    raw: String::from_utf8_lossy(&body).into_owned(),
                });
            }
            return Ok(parsed);
        }

        let raw = String::from_utf8_lossy(&body).into_owned();
        if !status.is_success() {
            return Err(Web3Error::Transport(format!("HTTP {}: {raw}", status.as_u16())));
        }
        tracing::warn!(method = %req.method, url = %self.url, "malformed response body");
        Err(Web3Error::MalformedResponse { raw })
    }

    fn url(&self) -> &str {
        &self.url
    }
}
