//! chainweb3-eth — typed `eth_*`, `net_*` and `web3_*` clients.
//!
//! [`Web3`] bundles one client per namespace over a single shared transport:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainweb3_eth::{BlockNumber, Web3};
//! use chainweb3_http::HttpProvider;
//!
//! # async fn run() -> Result<(), chainweb3_core::Web3Error> {
//! let web3 = Web3::new(Arc::new(HttpProvider::connect("localhost:8545")?));
//! let height = web3.eth.block_number().await?;
//! let block = web3.eth.get_block_by_number(BlockNumber::Number(height), false).await?;
//! # Ok(())
//! # }
//! ```

pub mod eth;
pub mod filter;
pub mod net;
pub mod types;
pub mod web3;

use std::sync::Arc;

use chainweb3_core::RpcTransport;

pub use eth::Eth;
pub use filter::{Filter, FilterChanges, FilterId, FilterKind, FilterRegistry};
pub use net::Net;
pub use types::{
    Block, BlockNumber, BlockTransactions, FilterOptions, Log, SyncProgress, SyncStatus, Topic,
    Transaction, TransactionReceipt, TransactionRequest, Work,
};
pub use web3::Web3Api;

/// Entry point: namespace clients sharing one provider.
#[derive(Clone)]
pub struct Web3 {
    transport: Arc<dyn RpcTransport>,
    pub eth: Eth,
    pub net: Net,
    pub web3: Web3Api,
}

impl Web3 {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            eth: Eth::new(transport.clone()),
            net: Net::new(transport.clone()),
            web3: Web3Api::new(transport.clone()),
            transport,
        }
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// `true` when the node answers `net_listening` with `true`.
    pub async fn is_connected(&self) -> bool {
        self.transport.is_connected().await
    }
}
