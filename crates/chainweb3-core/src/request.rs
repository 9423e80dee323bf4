//! JSON-RPC 2.0 wire types.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version tag carried by every request and response.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request ID: number, string or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl RpcId {
    pub fn number(n: u64) -> Self {
        Self::Number(n)
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::String(s) => Value::from(s.as_str()),
            Self::Null => Value::Null,
        }
    }
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A single JSON-RPC parameter value.
pub type RpcParam = Value;

/// Monotonic request-id source. One per provider instance.
#[derive(Debug)]
pub struct RequestIds {
    next: AtomicU64,
}

impl Default for RequestIds {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl RequestIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next id. Safe to call from many threads at once.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Build a request stamped with the next id.
    pub fn request(&self, method: impl Into<String>, params: Vec<RpcParam>) -> JsonRpcRequest {
        JsonRpcRequest::new(self.next_id(), method, params)
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<RpcParam>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }

    /// Wire bytes: `{"jsonrpc":"2.0","method":M,"params":P,"id":N}`.
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "{{\"jsonrpc\":{},\"method\":{},\"params\":{},\"id\":{}}}",
            Value::from(self.jsonrpc.as_str()),
            Value::from(self.method.as_str()),
            Value::Array(self.params.clone()),
            self.id.to_value(),
        )
        .into_bytes()
    }

    /// Raw access to a top-level request member, for routing.
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            "jsonrpc" => Some(Value::from(self.jsonrpc.as_str())),
            "method" => Some(Value::from(self.method.as_str())),
            "params" => Some(Value::Array(self.params.clone())),
            "id" => Some(self.id.to_value()),
            _ => None,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Result(Value),
    Error(JsonRpcError),
}

/// A JSON-RPC 2.0 response, validated once at parse time.
#[derive(Debug, Clone)]
pub struct JsonRpcResponse {
    pub id: RpcId,
    pub payload: ResponsePayload,
    fields: Map<String, Value>,
}

impl JsonRpcResponse {
    /// Parse raw bytes into a response.
    ///
    /// Returns `None` unless the bytes hold a single JSON object tagged
    /// `"jsonrpc": "2.0"` with an `id` and exactly one of `result` / `error`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(bytes).ok()?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        if fields.get("jsonrpc")?.as_str()? != JSONRPC_VERSION {
            return None;
        }
        let id: RpcId = serde_json::from_value(fields.get("id")?.clone()).ok()?;
        let payload = match (fields.get("result"), fields.get("error")) {
            (Some(result), None) => ResponsePayload::Result(result.clone()),
            (None, Some(error)) => {
                ResponsePayload::Error(serde_json::from_value(error.clone()).ok()?)
            }
            _ => return None,
        };
        Some(Self {
            id,
            payload,
            fields,
        })
    }

    /// Successful response carrying `result`.
    pub fn success(id: RpcId, result: Value) -> Self {
        let mut fields = Self::envelope(&id);
        fields.insert("result".into(), result.clone());
        Self {
            id,
            payload: ResponsePayload::Result(result),
            fields,
        }
    }

    /// Error response carrying `error`.
    pub fn failure(id: RpcId, error: JsonRpcError) -> Self {
        let mut fields = Self::envelope(&id);
        let mut encoded = Map::new();
        encoded.insert("code".into(), Value::from(error.code));
        encoded.insert("message".into(), Value::from(error.message.as_str()));
        if let Some(data) = &error.data {
            encoded.insert("data".into(), data.clone());
        }
        fields.insert("error".into(), Value::Object(encoded));
        Self {
            id,
            payload: ResponsePayload::Error(error),
            fields,
        }
    }

    fn envelope(id: &RpcId) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("jsonrpc".into(), Value::from(JSONRPC_VERSION));
        fields.insert("id".into(), id.to_value());
        fields
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        Value::Object(self.fields.clone()).to_string().into_bytes()
    }

    /// Raw access to a top-level response member.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if this is a successful response.
    pub fn is_ok(&self) -> bool {
        matches!(self.payload, ResponsePayload::Result(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(v) => Some(v),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(e) => Some(e),
        }
    }

    /// Unwrap the result value or return the error object.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.payload {
            ResponsePayload::Result(v) => Ok(v),
            ResponsePayload::Error(e) => Err(e),
        }
    }
}
