//! Typed client for the `web3_*` namespace.

use std::sync::Arc;

use serde_json::Value;

use chainweb3_core::{call_typed, Bytes, RpcTransport, Web3Error, H256};

#[derive(Clone)]
pub struct Web3Api {
    transport: Arc<dyn RpcTransport>,
}

impl Web3Api {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    pub async fn client_version(&self) -> Result<String, Web3Error> {
        call_typed(self.transport.as_ref(), "web3_clientVersion", vec![]).await
    }

    /// Keccak-256 of `data`, computed by the node.
    pub async fn sha3(&self, data: &[u8]) -> Result<H256, Web3Error> {
        let param = Value::String(Bytes::from(data).encode());
        call_typed(self.transport.as_ref(), "web3_sha3", vec![param]).await
    }
}
