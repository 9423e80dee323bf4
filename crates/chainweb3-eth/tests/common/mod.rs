//! An in-process node answering the `eth`, `net` and `web3` namespaces with
//! fixed fixtures, plus enough filter state to exercise install/uninstall.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use chainweb3_core::{DispatchTransport, JsonRpcError, JsonRpcRequest};
use chainweb3_eth::Web3;

pub const ACCOUNT: &str = "0x407d73d8a49eeb85d32cf465507dd71d507100c1";
pub const BLOCK_HASH: &str = "0xe670ec64341771606e55d6b4ca35a1a6b75ee3d5145a99d05921026d15273310";
pub const TX_HASH: &str = "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238";
pub const LOG_ADDRESS: &str = "0x16c5785ac562ff41e2dcfdf829c5a142f1fccd7d";
pub const LOG_TOPIC: &str = "0x59ebeb90bc63057b6515673c3ecf9438e5058bca0f92585014eced636878c9a5";

fn method_not_found(method: &str) -> JsonRpcError {
    JsonRpcError::new(-32601, format!("the method {method} does not exist/is not available"))
}

fn invalid_params(method: &str, params: &[Value]) -> JsonRpcError {
    JsonRpcError::new(-32602, format!("unexpected params for {method}: {params:?}"))
}

/// Answer `want` only if the request carried exactly `expected` params.
fn expect(req: &JsonRpcRequest, expected: Value, want: Value) -> Result<Value, JsonRpcError> {
    if Value::Array(req.params.clone()) == expected {
        Ok(want)
    } else {
        Err(invalid_params(&req.method, &req.params))
    }
}

pub fn block_json() -> Value {
    json!({
        "number": "0x1b4",
        "hash": BLOCK_HASH,
        "parentHash": "0x9646252be9520f6e71339a8df9c55e4d7619deeb018d2a3f2d21fc165dde5eb5",
        "nonce": "0xe04d296d2460cfb8",
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
        "stateRoot": "0xd5855eb08b3387c0af375e9cdb6acfc05eb8f519e419b874b6ff2ffda7ed1dff",
        "miner": "0x4e65fda2159562a496f9f3522f89122a3088497a",
        "difficulty": "0x027f07",
        "totalDifficulty": "0x027f07",
        "extraData": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "size": "0x027f07",
        "gasLimit": "0x9f759",
        "gasUsed": "0x9f759",
        "timestamp": "0x54e34e8e",
        "transactions": [TX_HASH],
        "uncles": []
    })
}

pub fn transaction_json() -> Value {
    json!({
        "hash": "0xc6ef2fc5426d6ad6fd9e2a26abeab0aa2411b7ab17f30a99d3cb96aed1d1055b",
        "nonce": "0x0",
        "blockHash": "0xbeab0aa2411b7ab17f30a99d3cb9c6ef2fc5426d6ad6fd9e2a26a6aed1d1055b",
        "blockNumber": "0x15df",
        "transactionIndex": "0x1",
        "from": ACCOUNT,
        "to": "0x85d43d8a49eeb85d32cf465507dd71d507100c10",
        "value": "0x7f110",
        "gas": "0x7f110",
        "gasPrice": "0x09184e72a000",
        "input": "0x603880600c6000396000f300603880600c6000396000f3603880600c6000396000f360"
    })
}

pub fn receipt_json() -> Value {
    json!({
        "transactionHash": TX_HASH,
        "transactionIndex": "0x1",
        "blockNumber": "0xb",
        "blockHash": "0xc6ef2fc5426d6ad6fd9e2a26abeab0aa2411b7ab17f30a99d3cb96aed1d1055b",
        "cumulativeGasUsed": "0x33bc",
        "gasUsed": "0x4dc",
        "contractAddress": "0xb60e8dd61c5d32be8058bb8eb970870f07233155",
        "logs": [],
        "status": "0x1"
    })
}

pub fn log_json() -> Value {
    json!({
        "logIndex": "0x1",
        "blockNumber": "0x1b4",
        "blockHash": "0x8216c5785ac562ff41e2dcfdf5785ac562ff41e2dcfdf829c5a142f1fccd7d00",
        "transactionHash": "0xdf829c5a142f1fccd7d8216c5785ac562ff41e2dcfdf5785ac562ff41e2dcf00",
        "transactionIndex": "0x0",
        "address": LOG_ADDRESS,
        "data": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "topics": [LOG_TOPIC]
    })
}

/// Installed filters by id; the flag marks log filters.
#[derive(Default)]
struct FilterTable {
    next: u64,
    live: HashMap<String, bool>,
}

fn eth(req: &JsonRpcRequest, filters: &Mutex<FilterTable>) -> Result<Value, JsonRpcError> {
    let p = &req.params;
    match req.method.as_str() {
        "eth_protocolVersion" => Ok(json!("54")),
        "eth_syncing" => Ok(json!({
            "startingBlock": "0x384",
            "currentBlock": "0x386",
            "highestBlock": "0x454"
        })),
        "eth_coinbase" => Ok(json!(ACCOUNT)),
        "eth_mining" => Ok(json!(true)),
        "eth_hashrate" => Ok(json!("0x38a")),
        "eth_gasPrice" => Ok(json!("0x09184e72a000")),
        "eth_accounts" => Ok(json!([ACCOUNT, "0x407d73d8a49ee783afd32cf465507dd71d507100"])),
        "eth_blockNumber" => Ok(json!("0x4b7")),
        "eth_getBalance" => expect(req, json!([ACCOUNT, "latest"]), json!("0x0234c8a3397aab58")),
        "eth_getStorageAt" => expect(
            req,
            json!([ACCOUNT, "0x0", "latest"]),
            json!("0x0000000000000000000000000000000000000000000000000000000000000003"),
        ),
        "eth_getTransactionCount" => expect(req, json!([ACCOUNT, "latest"]), json!("0x1")),
        "eth_getBlockTransactionCountByHash" => expect(req, json!([BLOCK_HASH]), json!("0xb")),
        "eth_getBlockTransactionCountByNumber" => expect(req, json!(["latest"]), json!("0xa")),
        "eth_getUncleCountByBlockHash" => expect(req, json!([BLOCK_HASH]), json!("0x1")),
        "eth_getUncleCountByBlockNumber" => expect(req, json!(["0xe8"]), json!("0x1")),
        "eth_getCode" => expect(
            req,
            json!(["0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b", "0x2"]),
            json!("0x600160008035811a818181146012578301005b601b6001356025565b8060005260206000f25b600060078202905091905056"),
        ),
        // "Schoolbus"
        "eth_sign" => expect(
            req,
            json!(["0xd1ade25ccd3d550a7eb532ac759cac7be09c2719", "0x5363686f6f6c627573"]),
            json!("0x2ac19db245478a06032e69cdbd2b54e648b78431d0a47bd1fbab18f79f820ba407466e37adbe9e84541cab97ab7d290f4a64a5825c876d22109f3bf813254e8601"),
        ),
        "eth_sendTransaction" | "eth_sendRawTransaction" => {
            Ok(json!("0xe670ec64341771606e55d6b4ca35a1a6b75ee3d5145a99d05921026d15273310"))
        }
        "eth_call" => Ok(json!("0x")),
        "eth_estimateGas" => Ok(json!("0x5208")),
        "eth_getBlockByHash" => match p.first().and_then(Value::as_str) {
            Some(BLOCK_HASH) => Ok(block_json()),
            _ => Ok(Value::Null),
        },
        "eth_getBlockByNumber" => match p.first().and_then(Value::as_str) {
            Some("0x1b4") | Some("latest") => Ok(block_json()),
            _ => Ok(Value::Null),
        },
        "eth_getTransactionByHash"
        | "eth_getTransactionByBlockHashAndIndex"
        | "eth_getTransactionByBlockNumberAndIndex" => Ok(transaction_json()),
        "eth_getTransactionReceipt" => match p.first().and_then(Value::as_str) {
            Some(TX_HASH) => Ok(receipt_json()),
            _ => Ok(Value::Null),
        },
        "eth_getUncleByBlockHashAndIndex" | "eth_getUncleByBlockNumberAndIndex" => Ok(block_json()),
        "eth_getCompilers" => Ok(json!(["solidity", "lll", "serpent"])),
        "eth_newFilter" | "eth_newBlockFilter" | "eth_newPendingTransactionFilter" => {
            let mut table = filters.lock().unwrap();
            table.next += 1;
            let id = format!("0x{:x}", table.next);
            table.live.insert(id.clone(), req.method == "eth_newFilter");
            Ok(json!(id))
        }
        "eth_uninstallFilter" => {
            let id = p.first().and_then(Value::as_str).unwrap_or_default();
            Ok(json!(filters.lock().unwrap().live.remove(id).is_some()))
        }
        "eth_getFilterChanges" | "eth_getFilterLogs" => {
            let id = p.first().and_then(Value::as_str).unwrap_or_default();
            match filters.lock().unwrap().live.get(id) {
                Some(true) => Ok(json!([log_json()])),
                Some(false) => Ok(json!([BLOCK_HASH])),
                None => Err(JsonRpcError::new(-32000, "filter not found")),
            }
        }
        "eth_getLogs" => Ok(json!([log_json()])),
        "eth_getWork" => Ok(json!([
            "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
            "0x5EED00000000000000000000000000005EED0000000000000000000000000000",
            "0xd1ff1c01710000000000000000000000d1ff1c01710000000000000000000000"
        ])),
        "eth_submitWork" | "eth_submitHashrate" => Ok(json!(true)),
        other => Err(method_not_found(other)),
    }
}

fn net(req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
    match req.method.as_str() {
        "net_version" => Ok(json!("1")),
        "net_listening" => Ok(json!(true)),
        "net_peerCount" => Ok(json!("0x2")),
        other => Err(method_not_found(other)),
    }
}

fn web3(req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
    match req.method.as_str() {
        "web3_clientVersion" => Ok(json!("Mist/v0.9.3/darwin/go1.4.1")),
        // keccak256(0x68656c6c6f20776f726c64)
        "web3_sha3" => expect(
            req,
            json!(["0x68656c6c6f20776f726c64"]),
            json!("0x47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad"),
        ),
        other => Err(method_not_found(other)),
    }
}

/// A fake node with all three namespaces registered.
pub fn node() -> DispatchTransport {
    let filters = Arc::new(Mutex::new(FilterTable::default()));
    DispatchTransport::builder()
        .register_fn("eth", move |req| eth(req, &filters))
        .unwrap()
        .register_fn("net", net)
        .unwrap()
        .register_fn("web3", web3)
        .unwrap()
        .build()
}

pub fn web3_client() -> Web3 {
    Web3::new(Arc::new(node()))
}
