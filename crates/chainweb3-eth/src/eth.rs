//! Typed client for the `eth_*` namespace.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use chainweb3_core::{call_typed, decode_result, Address, Bytes, Quantity, RpcTransport, Web3Error, H256};

use crate::filter::{Filter, FilterChanges, FilterId, FilterKind, FilterRegistry};
use crate::types::{
    Block, BlockNumber, FilterOptions, Log, SyncStatus, Transaction, TransactionReceipt,
    TransactionRequest, Work,
};

fn hex(value: &impl ToString) -> Value {
    Value::String(value.to_string())
}

fn index(i: u64) -> Value {
    Value::String(Quantity::from(i).encode())
}

fn encode_param<T: Serialize>(method: &str, value: &T) -> Result<Value, Web3Error> {
    serde_json::to_value(value).map_err(|e| Web3Error::InvalidParams {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// `eth_*` methods over a shared transport.
///
/// Every method is one request and one response. Results pass through the
/// hex codec; a malformed field fails the whole call.
#[derive(Clone)]
pub struct Eth {
    transport: Arc<dyn RpcTransport>,
    filters: FilterRegistry,
}

impl Eth {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            filters: FilterRegistry::new(),
        }
    }

    /// Live filters installed through this client.
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, Web3Error> {
        call_typed(self.transport.as_ref(), method, params).await
    }

    // ─── Node state ───────────────────────────────────────────────────────

    pub async fn protocol_version(&self) -> Result<String, Web3Error> {
        self.request("eth_protocolVersion", vec![]).await
    }

    pub async fn syncing(&self) -> Result<SyncStatus, Web3Error> {
        self.request("eth_syncing", vec![]).await
    }

    pub async fn coinbase(&self) -> Result<Address, Web3Error> {
        self.request("eth_coinbase", vec![]).await
    }

    pub async fn mining(&self) -> Result<bool, Web3Error> {
        self.request("eth_mining", vec![]).await
    }

    pub async fn hashrate(&self) -> Result<Quantity, Web3Error> {
        self.request("eth_hashrate", vec![]).await
    }

    pub async fn gas_price(&self) -> Result<Quantity, Web3Error> {
        self.request("eth_gasPrice", vec![]).await
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, Web3Error> {
        self.request("eth_accounts", vec![]).await
    }

    pub async fn block_number(&self) -> Result<Quantity, Web3Error> {
        self.request("eth_blockNumber", vec![]).await
    }

    pub async fn get_compilers(&self) -> Result<Vec<String>, Web3Error> {
        self.request("eth_getCompilers", vec![]).await
    }

    // ─── Account state ────────────────────────────────────────────────────

    pub async fn get_balance(&self, address: &Address, block: BlockNumber) -> Result<Quantity, Web3Error> {
        self.request("eth_getBalance", vec![hex(address), hex(&block)]).await
    }

    /// One 32-byte storage word at `position`.
    pub async fn get_storage_at(
        &self,
        address: &Address,
        position: &Quantity,
        block: BlockNumber,
    ) -> Result<H256, Web3Error> {
        self.request("eth_getStorageAt", vec![hex(address), hex(position), hex(&block)])
            .await
    }

    pub async fn get_transaction_count(&self, address: &Address, block: BlockNumber) -> Result<Quantity, Web3Error> {
        self.request("eth_getTransactionCount", vec![hex(address), hex(&block)])
            .await
    }

    pub async fn get_code(&self, address: &Address, block: BlockNumber) -> Result<Bytes, Web3Error> {
        self.request("eth_getCode", vec![hex(address), hex(&block)]).await
    }

    // ─── Block counts ─────────────────────────────────────────────────────

    pub async fn get_block_transaction_count_by_hash(&self, hash: &H256) -> Result<Quantity, Web3Error> {
        self.request("eth_getBlockTransactionCountByHash", vec![hex(hash)])
            .await
    }

    pub async fn get_block_transaction_count_by_number(&self, block: BlockNumber) -> Result<Quantity, Web3Error> {
        self.request("eth_getBlockTransactionCountByNumber", vec![hex(&block)])
            .await
    }

    pub async fn get_uncle_count_by_block_hash(&self, hash: &H256) -> Result<Quantity, Web3Error> {
        self.request("eth_getUncleCountByBlockHash", vec![hex(hash)]).await
    }

    pub async fn get_uncle_count_by_block_number(&self, block: BlockNumber) -> Result<Quantity, Web3Error> {
        self.request("eth_getUncleCountByBlockNumber", vec![hex(&block)])
            .await
    }

    // ─── Transactions ─────────────────────────────────────────────────────

    /// Sign `message` with an account the node holds the key for.
    pub async fn sign(&self, address: &Address, message: &[u8]) -> Result<Bytes, Web3Error> {
        self.request("eth_sign", vec![hex(address), hex(&Bytes::from(message))])
            .await
    }

    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<H256, Web3Error> {
        const METHOD: &str = "eth_sendTransaction";
        self.request(METHOD, vec![encode_param(METHOD, tx)?]).await
    }

    pub async fn send_raw_transaction(&self, raw: &Bytes) -> Result<H256, Web3Error> {
        self.request("eth_sendRawTransaction", vec![hex(raw)]).await
    }

    /// Execute a message call without creating a transaction.
    pub async fn call(&self, tx: &TransactionRequest, block: BlockNumber) -> Result<Bytes, Web3Error> {
        const METHOD: &str = "eth_call";
        self.request(METHOD, vec![encode_param(METHOD, tx)?, hex(&block)])
            .await
    }

    pub async fn estimate_gas(&self, tx: &TransactionRequest, block: BlockNumber) -> Result<Quantity, Web3Error> {
        const METHOD: &str = "eth_estimateGas";
        self.request(METHOD, vec![encode_param(METHOD, tx)?, hex(&block)])
            .await
    }

    // ─── Blocks, transactions and receipts ────────────────────────────────
    //
    // A `null` result (unknown hash, future height) decodes to `None`.

    /// `full = true` asks for transaction objects instead of hashes.
    pub async fn get_block_by_hash(&self, hash: &H256, full: bool) -> Result<Option<Block>, Web3Error> {
        self.request("eth_getBlockByHash", vec![hex(hash), Value::Bool(full)])
            .await
    }

    pub async fn get_block_by_number(&self, block: BlockNumber, full: bool) -> Result<Option<Block>, Web3Error> {
        self.request("eth_getBlockByNumber", vec![hex(&block), Value::Bool(full)])
            .await
    }

    pub async fn get_transaction_by_hash(&self, hash: &H256) -> Result<Option<Transaction>, Web3Error> {
        self.request("eth_getTransactionByHash", vec![hex(hash)]).await
    }

    pub async fn get_transaction_by_block_hash_and_index(
        &self,
        hash: &H256,
        position: u64,
    ) -> Result<Option<Transaction>, Web3Error> {
        self.request(
            "eth_getTransactionByBlockHashAndIndex",
            vec![hex(hash), index(position)],
        )
        .await
    }

    pub async fn get_transaction_by_block_number_and_index(
        &self,
        block: BlockNumber,
        position: u64,
    ) -> Result<Option<Transaction>, Web3Error> {
        self.request(
            "eth_getTransactionByBlockNumberAndIndex",
            vec![hex(&block), index(position)],
        )
        .await
    }

    /// `None` while the transaction is pending or unknown.
    pub async fn get_transaction_receipt(&self, hash: &H256) -> Result<Option<TransactionReceipt>, Web3Error> {
        self.request("eth_getTransactionReceipt", vec![hex(hash)]).await
    }

    pub async fn get_uncle_by_block_hash_and_index(
        &self,
        hash: &H256,
        position: u64,
    ) -> Result<Option<Block>, Web3Error> {
        self.request(
            "eth_getUncleByBlockHashAndIndex",
            vec![hex(hash), index(position)],
        )
        .await
    }

    pub async fn get_uncle_by_block_number_and_index(
        &self,
        block: BlockNumber,
        position: u64,
    ) -> Result<Option<Block>, Web3Error> {
        self.request(
            "eth_getUncleByBlockNumberAndIndex",
            vec![hex(&block), index(position)],
        )
        .await
    }

    // ─── Filters ──────────────────────────────────────────────────────────

    async fn install(&self, method: &str, params: Vec<Value>, kind: FilterKind) -> Result<Filter, Web3Error> {
        let id: FilterId = self.request(method, params).await?;
        let filter = Filter::new(id, kind);
        self.filters.register(&filter);
        tracing::debug!(id = %filter.id(), kind = filter.kind().name(), "filter installed");
        Ok(filter)
    }

    pub async fn new_filter(&self, options: FilterOptions) -> Result<Filter, Web3Error> {
        const METHOD: &str = "eth_newFilter";
        let params = vec![encode_param(METHOD, &options)?];
        self.install(METHOD, params, FilterKind::Log(options)).await
    }

    pub async fn new_block_filter(&self) -> Result<Filter, Web3Error> {
        self.install("eth_newBlockFilter", vec![], FilterKind::Block).await
    }

    pub async fn new_pending_transaction_filter(&self) -> Result<Filter, Web3Error> {
        self.install(
            "eth_newPendingTransactionFilter",
            vec![],
            FilterKind::PendingTransaction,
        )
        .await
    }

    /// Returns the node's answer; on `true` the filter leaves the registry.
    pub async fn uninstall_filter(&self, filter: &Filter) -> Result<bool, Web3Error> {
        let removed: bool = self
            .request("eth_uninstallFilter", vec![hex(filter.id())])
            .await?;
        if removed {
            self.filters.remove(filter.id());
            tracing::debug!(id = %filter.id(), live = self.filters.len(), "filter uninstalled");
        } else {
            tracing::debug!(id = %filter.id(), "node did not know filter");
        }
        Ok(removed)
    }

    /// Entries since the last poll, decoded according to the filter's kind.
    pub async fn get_filter_changes(&self, filter: &Filter) -> Result<FilterChanges, Web3Error> {
        const METHOD: &str = "eth_getFilterChanges";
        let raw = self
            .transport
            .call(METHOD, vec![hex(filter.id())])
            .await?;
        match filter.kind() {
            FilterKind::Log(_) => decode_result(METHOD, raw).map(FilterChanges::Logs),
            FilterKind::Block | FilterKind::PendingTransaction => {
                decode_result(METHOD, raw).map(FilterChanges::Hashes)
            }
        }
    }

    /// Every log matching a log filter's criteria.
    pub async fn get_filter_logs(&self, filter: &Filter) -> Result<Vec<Log>, Web3Error> {
        self.request("eth_getFilterLogs", vec![hex(filter.id())]).await
    }

    pub async fn get_logs(&self, options: &FilterOptions) -> Result<Vec<Log>, Web3Error> {
        const METHOD: &str = "eth_getLogs";
        self.request(METHOD, vec![encode_param(METHOD, options)?]).await
    }

    // ─── Mining ───────────────────────────────────────────────────────────

    pub async fn get_work(&self) -> Result<Work, Web3Error> {
        const METHOD: &str = "eth_getWork";
        let items: Vec<H256> = self.request(METHOD, vec![]).await?;
        match items.as_slice() {
            [header, seed, boundary] => Ok(Work {
                header: *header,
                seed: *seed,
                boundary: *boundary,
            }),
            _ => Err(Web3Error::Decode {
                method: METHOD.to_string(),
                reason: format!("expected 3 work items, got {}", items.len()),
            }),
        }
    }

    /// Submit a proof-of-work solution; `nonce` goes out as 8 big-endian bytes.
    pub async fn submit_work(&self, nonce: u64, header: &H256, mix_digest: &H256) -> Result<bool, Web3Error> {
        let nonce = Bytes::from(nonce.to_be_bytes().to_vec());
        self.request("eth_submitWork", vec![hex(&nonce), hex(header), hex(mix_digest)])
            .await
    }

    /// Report a miner's hashrate; the rate goes out as a 32-byte word.
    pub async fn submit_hashrate(&self, rate: u64, client_id: &H256) -> Result<bool, Web3Error> {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&rate.to_be_bytes());
        self.request("eth_submitHashrate", vec![hex(&H256::from(word)), hex(client_id)])
            .await
    }
}
