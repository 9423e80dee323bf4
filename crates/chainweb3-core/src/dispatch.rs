//! Table-driven in-process transport.
//!
//! Routes each request by its method namespace (the text before the first
//! `_`, e.g. `eth` in `eth_getBalance`) to a registered handler. Used to stand
//! in for a node in tests and local tooling without touching the network.
//!
//! ```rust
//! use chainweb3_core::dispatch::DispatchTransport;
//! use serde_json::json;
//!
//! let transport = DispatchTransport::builder()
//!     .register_fn("net", |_| Ok(json!(true)))
//!     .unwrap()
//!     .build();
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Web3Error;
use crate::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestIds};
use crate::transport::RpcTransport;

/// Answers every method of one namespace.
pub trait NamespaceHandler: Send + Sync {
    fn handle(&self, req: &JsonRpcRequest) -> Result<Value, JsonRpcError>;
}

impl<F> NamespaceHandler for F
where
    F: Fn(&JsonRpcRequest) -> Result<Value, JsonRpcError> + Send + Sync,
{
    fn handle(&self, req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        self(req)
    }
}

/// The namespace of a method name: the non-empty text before the first `_`.
pub fn namespace_of(method: &str) -> Option<&str> {
    match method.split_once('_') {
        Some((ns, _)) if !ns.is_empty() => Some(ns),
        _ => None,
    }
}

/// Builder for [`DispatchTransport`]; validates namespaces as they are added.
#[derive(Default)]
pub struct DispatchBuilder {
    handlers: HashMap<String, Arc<dyn NamespaceHandler>>,
}

impl DispatchBuilder {
    /// Register `handler` for `namespace`.
    ///
    /// The namespace must be non-empty, contain no `_`, and not already be
    /// registered.
    pub fn register<H>(mut self, namespace: &str, handler: H) -> Result<Self, Web3Error>
    where
        H: NamespaceHandler + 'static,
    {
        if namespace.is_empty() || namespace.contains('_') {
            return Err(Web3Error::InvalidNamespace(namespace.to_string()));
        }
        if self.handlers.contains_key(namespace) {
            return Err(Web3Error::InvalidNamespace(format!("{namespace} (already registered)")));
        }
        self.handlers.insert(namespace.to_string(), Arc::new(handler));
        Ok(self)
    }

    /// Register a closure for `namespace`.
    pub fn register_fn<F>(self, namespace: &str, f: F) -> Result<Self, Web3Error>
    where
        F: Fn(&JsonRpcRequest) -> Result<Value, JsonRpcError> + Send + Sync + 'static,
    {
        self.register(namespace, f)
    }

    pub fn build(self) -> DispatchTransport {
        DispatchTransport {
            ids: RequestIds::new(),
            handlers: self.handlers,
        }
    }
}

/// In-process provider that dispatches to per-namespace handlers.
pub struct DispatchTransport {
    ids: RequestIds,
    handlers: HashMap<String, Arc<dyn NamespaceHandler>>,
}

impl DispatchTransport {
    pub fn builder() -> DispatchBuilder {
        DispatchBuilder::default()
    }

    /// Registered namespaces, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn route(&self, method: &str) -> Option<&Arc<dyn NamespaceHandler>> {
        self.handlers.get(namespace_of(method)?)
    }
}

#[async_trait]
impl RpcTransport for DispatchTransport {
    fn ids(&self) -> &RequestIds {
        &self.ids
    }

    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, Web3Error> {
        let method = match req.get("method") {
            Some(Value::String(m)) => m,
            other => {
                return Err(Web3Error::UnrecognizedMethod(
                    other.map(|v| v.to_string()).unwrap_or_default(),
                ))
            }
        };
        let handler = self
            .route(&method)
            .ok_or_else(|| Web3Error::UnrecognizedMethod(method.clone()))?;

        tracing::debug!(method = %method, id = %req.id, "dispatching in-process");
        let resp = match handler.handle(&req) {
            Ok(result) => JsonRpcResponse::success(req.id, result),
            Err(error) => JsonRpcResponse::failure(req.id, error),
        };

        // Round-trip through the wire form so envelope validation applies.
        let bytes = resp.to_bytes();
        JsonRpcResponse::parse(&bytes).ok_or_else(|| Web3Error::MalformedResponse {
            raw: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn url(&self) -> &str {
        "dispatch"
    }
}
