//! Domain objects decoded from `eth_*` results, and the parameter types
//! encoded into requests.
//!
//! Field names follow the wire (`camelCase`). Every hex field goes through the
//! codec types, so a malformed value surfaces as
//! [`MalformedValue`](chainweb3_core::MalformedValue) rather than a default.
//! Fields a node may omit or send as `null` (pending blocks, pre- or
//! post-fork additions) are `Option`s or fall back to the type's `Default`,
//! as noted per field.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use chainweb3_core::{Address, Bytes, MalformedValue, Quantity, ValueKind, H256};

/// Treat `null` like an absent field and use `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Parameters ───────────────────────────────────────────────────────────────

/// Block selector: a tag or an explicit height.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockNumber {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(Quantity),
}

impl Serialize for BlockNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Latest => serializer.serialize_str("latest"),
            Self::Earliest => serializer.serialize_str("earliest"),
            Self::Pending => serializer.serialize_str("pending"),
            Self::Number(n) => n.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BlockNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl FromStr for BlockNumber {
    type Err = MalformedValue;

    /// Accepts a tag, a hex quantity, or a decimal height.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            _ if s.starts_with("0x") => Quantity::decode(s).map(Self::Number),
            _ => s
                .parse::<u64>()
                .map(|n| Self::Number(n.into()))
                .map_err(|_| MalformedValue::new(s, ValueKind::Quantity, "not a block tag or number")),
        }
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Earliest => f.write_str("earliest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Quantity> for BlockNumber {
    fn from(n: Quantity) -> Self {
        Self::Number(n)
    }
}

/// Parameters of `eth_sendTransaction`, `eth_call` and `eth_estimateGas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Quantity>,
}

/// One position of a log filter's topic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Topic {
    /// Wildcard, `null` on the wire.
    Any,
    One(H256),
    /// Matches any of the listed topics.
    OneOf(Vec<H256>),
}

/// Criteria for `eth_newFilter` and `eth_getLogs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockNumber>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Topic>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_block(mut self, block: impl Into<BlockNumber>) -> Self {
        self.from_block = Some(block.into());
        self
    }

    pub fn to_block(mut self, block: impl Into<BlockNumber>) -> Self {
        self.to_block = Some(block.into());
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address.push(address);
        self
    }

    pub fn topic(mut self, topic: Topic) -> Self {
        self.topics.push(topic);
        self
    }
}

// ─── Results ──────────────────────────────────────────────────────────────────

/// A block header plus its transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// `None` for a pending block.
    #[serde(default)]
    pub number: Option<Quantity>,
    /// `None` for a pending block.
    #[serde(default)]
    pub hash: Option<H256>,
    pub parent_hash: H256,
    /// Proof-of-work nonce; empty when the node omits it (pending blocks).
    #[serde(default, deserialize_with = "null_default")]
    pub nonce: Bytes,
    pub sha3_uncles: H256,
    /// Empty when the node omits it.
    #[serde(default, deserialize_with = "null_default")]
    pub logs_bloom: Bytes,
    pub transactions_root: H256,
    pub state_root: H256,
    /// Zero hash when the node omits it.
    #[serde(default, deserialize_with = "null_default")]
    pub receipts_root: H256,
    #[serde(default)]
    pub miner: Option<Address>,
    pub difficulty: Quantity,
    /// Zero when the node omits it.
    #[serde(default, deserialize_with = "null_default")]
    pub total_difficulty: Quantity,
    #[serde(default, deserialize_with = "null_default")]
    pub extra_data: Bytes,
    pub size: Quantity,
    pub gas_limit: Quantity,
    pub gas_used: Quantity,
    pub timestamp: Quantity,
    #[serde(default, deserialize_with = "null_default")]
    pub transactions: BlockTransactions,
    #[serde(default, deserialize_with = "null_default")]
    pub uncles: Vec<H256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<Quantity>,
}

/// Transaction hashes, or full objects when the block was requested with
/// `full = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<H256>),
    Full(Vec<Transaction>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        Self::Hashes(Vec::new())
    }
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            Self::Hashes(h) => h.len(),
            Self::Full(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transaction hashes regardless of representation.
    pub fn hashes(&self) -> Vec<H256> {
        match self {
            Self::Hashes(h) => h.clone(),
            Self::Full(t) => t.iter().map(|tx| tx.hash).collect(),
        }
    }
}

/// A transaction as returned by the `eth_getTransactionBy*` family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: H256,
    pub nonce: Quantity,
    /// `None` while pending.
    #[serde(default)]
    pub block_hash: Option<H256>,
    #[serde(default)]
    pub block_number: Option<Quantity>,
    #[serde(default)]
    pub transaction_index: Option<Quantity>,
    pub from: Address,
    /// `None` for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
    pub value: Quantity,
    pub gas: Quantity,
    #[serde(default)]
    pub gas_price: Option<Quantity>,
    #[serde(alias = "data")]
    pub input: Bytes,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Quantity>,
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: H256,
    pub transaction_index: Quantity,
    pub block_hash: H256,
    pub block_number: Quantity,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    pub cumulative_gas_used: Quantity,
    pub gas_used: Quantity,
    /// Set only when the transaction created a contract.
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default, deserialize_with = "null_default")]
    pub logs: Vec<Log>,
    #[serde(default, deserialize_with = "null_default")]
    pub logs_bloom: Bytes,
    /// `1` success, `0` failure; absent before Byzantium.
    #[serde(default)]
    pub status: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<Quantity>,
}

impl TransactionReceipt {
    /// `Some(true)` when the receipt carries a success status.
    pub fn succeeded(&self) -> Option<bool> {
        self.status.as_ref().map(|s| *s != Quantity::zero())
    }
}

/// An event log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// `true` when the log was dropped by a chain reorganisation.
    #[serde(default, deserialize_with = "null_default")]
    pub removed: bool,
    /// Position fields are `None` while the log is pending.
    #[serde(default)]
    pub log_index: Option<Quantity>,
    #[serde(default)]
    pub transaction_index: Option<Quantity>,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    #[serde(default)]
    pub block_hash: Option<H256>,
    #[serde(default)]
    pub block_number: Option<Quantity>,
    pub address: Address,
    pub data: Bytes,
    #[serde(default, deserialize_with = "null_default")]
    pub topics: Vec<H256>,
}

/// Progress reported by `eth_syncing` while the node is catching up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub starting_block: Quantity,
    pub current_block: Quantity,
    pub highest_block: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_states: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulled_states: Option<Quantity>,
}

/// Result of `eth_syncing`: `false`, or a progress object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    NotSyncing,
    Syncing(SyncProgress),
}

impl SyncStatus {
    pub fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing(_))
    }
}

impl Serialize for SyncStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotSyncing => serializer.serialize_bool(false),
            Self::Syncing(progress) => progress.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SyncStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Progress(SyncProgress),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Flag(false) => Ok(Self::NotSyncing),
            Wire::Flag(true) => Err(de::Error::custom("eth_syncing returned true without progress")),
            Wire::Progress(progress) => Ok(Self::Syncing(progress)),
        }
    }
}

/// Proof-of-work package from `eth_getWork`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Work {
    /// Current block header pow-hash.
    pub header: H256,
    /// Seed hash used for the DAG.
    pub seed: H256,
    /// Boundary condition ("target"), 2^256 / difficulty.
    pub boundary: H256,
}
