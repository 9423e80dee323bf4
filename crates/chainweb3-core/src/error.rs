//! Error types shared by every chainweb3 crate.

use thiserror::Error;

use crate::codec::{JsonDecodeError, MalformedValue};
use crate::request::JsonRpcError;

/// Errors that can occur while issuing a JSON-RPC call.
#[derive(Debug, Error)]
pub enum Web3Error {
    /// The node could not be reached (connection refused, reset, body read failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the provider's configured timeout.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The reply is not a single well-formed JSON-RPC 2.0 response.
    #[error("malformed response body: {raw}")]
    MalformedResponse { raw: String },

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// A hex field failed to decode.
    #[error(transparent)]
    MalformedValue(#[from] MalformedValue),

    /// The result does not have the shape the method declares.
    #[error("cannot decode result of {method}: {reason}")]
    Decode { method: String, reason: String },

    /// A request parameter could not be encoded.
    #[error("cannot encode params of {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    /// No handler namespace matches the method name.
    #[error("unrecognized method {0:?}")]
    UnrecognizedMethod(String),

    /// A dispatch namespace was rejected at registration.
    #[error("invalid namespace {0:?}")]
    InvalidNamespace(String),

    /// The provider endpoint could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("client error: {0}")]
    Client(String),
}

impl Web3Error {
    /// Returns `true` if this error is transient and the call may be repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the node answered with a JSON-RPC error object.
    pub fn is_rpc_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }

    /// Attach the method name to a result decode failure.
    pub fn decode(method: &str, err: JsonDecodeError) -> Self {
        match err {
            JsonDecodeError::Malformed(m) => Self::MalformedValue(m),
            JsonDecodeError::Shape(e) => Self::Decode {
                method: method.to_string(),
                reason: e.to_string(),
            },
        }
    }
}
