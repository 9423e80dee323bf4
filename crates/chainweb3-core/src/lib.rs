//! chainweb3-core — wire codec, JSON-RPC envelope and provider trait.
//!
//! # Overview
//!
//! chainweb3 is a typed client for a node's `eth_*` / `net_*` / `web3_*`
//! JSON-RPC interface. The core crate defines:
//!
//! - [`codec`]: hex wire primitives: [`Quantity`], [`Bytes`], [`Address`], [`H256`]
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: the request/response envelope
//! - [`RequestIds`]: per-provider monotonic request ids
//! - [`RpcTransport`]: the provider capability (`send` + `is_connected`)
//! - [`dispatch`]: table-driven in-process provider keyed by method namespace
//! - [`retry`]: opt-in backoff wrapper for transient transport failures
//! - [`Web3Error`]: structured error type

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;

pub use codec::{Address, Bytes, MalformedValue, Quantity, ValueKind, H256};
pub use dispatch::{namespace_of, DispatchTransport, NamespaceHandler};
pub use error::Web3Error;
pub use request::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestIds, ResponsePayload, RpcId, RpcParam,
};
pub use retry::{RetryConfig, RetryTransport};
pub use transport::{call_typed, decode_result, RpcTransport};
