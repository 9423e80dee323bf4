//! The `RpcTransport` trait — the provider capability every client is built on.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::decode_json;
use crate::error::Web3Error;
use crate::request::{JsonRpcRequest, JsonRpcResponse, RpcParam, RequestIds};

/// Method used by the default [`RpcTransport::is_connected`] probe.
pub const LIVENESS_METHOD: &str = "net_listening";

/// The capability every RPC provider implements: `send` plus a liveness probe.
///
/// Each call maps to exactly one transport round trip; implementations must
/// not retry internally. Wrap a provider in
/// [`RetryTransport`](crate::retry::RetryTransport) to opt into retries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// The id source requests for this provider are stamped from.
    fn ids(&self) -> &RequestIds;

    /// Send a single JSON-RPC request and return the parsed response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, Web3Error>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Build a request with the next id from this provider.
    fn request(&self, method: &str, params: Vec<RpcParam>) -> JsonRpcRequest {
        self.ids().request(method, params)
    }

    /// Call a method and return the raw result, or the node's error object
    /// as [`Web3Error::Rpc`].
    async fn call(&self, method: &str, params: Vec<RpcParam>) -> Result<Value, Web3Error> {
        let req = self.request(method, params);
        let resp = self.send(req).await?;
        resp.into_result().map_err(Web3Error::Rpc)
    }

    /// Liveness probe: `net_listening` must answer `true`.
    ///
    /// Any failure along the way reads as "not connected".
    async fn is_connected(&self) -> bool {
        match self.call(LIVENESS_METHOD, vec![]).await {
            Ok(Value::Bool(listening)) => listening,
            Ok(other) => {
                tracing::debug!(url = %self.url(), result = %other, "non-boolean liveness result");
                false
            }
            Err(e) => {
                tracing::debug!(url = %self.url(), error = %e, "liveness probe failed");
                false
            }
        }
    }
}

/// Decode the raw result of `method` into `T` through the hex codec.
pub fn decode_result<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, Web3Error> {
    decode_json(value).map_err(|e| Web3Error::decode(method, e))
}

/// Convenience: call `method` on `transport` and decode the result into `T`.
pub async fn call_typed<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    method: &str,
    params: Vec<RpcParam>,
) -> Result<T, Web3Error> {
    let value = transport.call(method, params).await?;
    decode_result(method, value)
}
