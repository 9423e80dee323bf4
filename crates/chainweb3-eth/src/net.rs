//! Typed client for the `net_*` namespace.

use std::sync::Arc;

use chainweb3_core::{call_typed, Quantity, RpcTransport, Web3Error};

#[derive(Clone)]
pub struct Net {
    transport: Arc<dyn RpcTransport>,
}

impl Net {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Network id, as the decimal string the node reports.
    pub async fn version(&self) -> Result<String, Web3Error> {
        call_typed(self.transport.as_ref(), "net_version", vec![]).await
    }

    pub async fn listening(&self) -> Result<bool, Web3Error> {
        call_typed(self.transport.as_ref(), "net_listening", vec![]).await
    }

    pub async fn peer_count(&self) -> Result<Quantity, Web3Error> {
        call_typed(self.transport.as_ref(), "net_peerCount", vec![]).await
    }
}
