//! JSON-RPC node stand-in for the vault flows.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Bytes, TxHash, U256, hex, keccak256},
    sol_types::SolCall,
};
use mockito::{Mock, ServerGuard};
use perp_client::abi::{erc20::IERC20, vault::IMarginVault};
use serde_json::{Value, json};

pub const CHAIN_ID: u64 = 421614;

/// How the node answers the calls of a deposit.
#[derive(Clone, Debug)]
pub struct Behaviour {
    /// Value returned by `allowance`.
    pub allowance: U256,
    /// Number of `null` receipts served before a transaction shows up as mined.
    pub pending_polls: usize,
    /// Receipt status of every mined transaction.
    pub status: bool,
    /// Revert data of the deposit simulation, `None` to let it succeed.
    pub deposit_revert: Option<Bytes>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            allowance: U256::ZERO,
            pending_polls: 0,
            status: true,
            deposit_revert: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Observed {
    pub methods: Vec<String>,
    pub sent: Vec<TxHash>,
    pub receipt_polls: HashMap<TxHash, usize>,
}

impl Observed {
    pub fn calls(&self, method: &str) -> usize {
        self.methods.iter().filter(|m| *m == method).count()
    }
}

pub struct Node {
    pub server: ServerGuard,
    observed: Arc<Mutex<Observed>>,
    _mock: Mock,
}

impl Node {
    pub async fn start(behaviour: Behaviour) -> Self {
        let mut server = mockito::Server::new_async().await;
        let observed = Arc::new(Mutex::new(Observed::default()));
        let state = observed.clone();
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |request| {
                let request: Value = serde_json::from_slice(request.body().unwrap()).unwrap();
                let response = respond(&behaviour, &mut state.lock().unwrap(), &request);
                serde_json::to_vec(&response).unwrap()
            })
            .expect_at_least(1)
            .create_async()
            .await;
        Self {
            server,
            observed,
            _mock: mock,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn observed(&self) -> std::sync::MutexGuard<'_, Observed> {
        self.observed.lock().unwrap()
    }
}

fn word(value: U256) -> String {
    hex::encode_prefixed(value.to_be_bytes::<32>())
}

fn respond(behaviour: &Behaviour, observed: &mut Observed, request: &Value) -> Value {
    let method = request["method"].as_str().unwrap_or_default();
    let params = &request["params"];
    observed.methods.push(method.to_string());

    let result = match method {
        "eth_chainId" => json!(format!("{CHAIN_ID:#x}")),
        "eth_getTransactionCount" => json!(format!("{:#x}", observed.sent.len())),
        "eth_estimateGas" => json!("0x186a0"),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => json!("0x3b9aca00"),
        "eth_feeHistory" => json!({
            "oldestBlock": "0x10",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x5f5e100"]],
        }),
        "eth_blockNumber" => json!("0x10"),
        "eth_call" => {
            let input = params[0]["input"]
                .as_str()
                .or_else(|| params[0]["data"].as_str())
                .unwrap_or_default();
            let selector = |call: [u8; 4]| input.starts_with(&hex::encode_prefixed(call));
            if selector(IERC20::allowanceCall::SELECTOR) {
                json!(word(behaviour.allowance))
            } else if selector(IERC20::approveCall::SELECTOR) {
                json!(word(U256::from(1)))
            } else if selector(IMarginVault::depositCall::SELECTOR) {
                match &behaviour.deposit_revert {
                    Some(data) => {
                        return json!({
                            "jsonrpc": "2.0",
                            "id": request["id"],
                            "error": { "code": 3, "message": "execution reverted", "data": data },
                        });
                    }
                    None => json!("0x"),
                }
            } else {
                json!("0x")
            }
        }
        "eth_sendRawTransaction" => {
            let raw: Bytes = serde_json::from_value(params[0].clone()).unwrap();
            let tx_hash = keccak256(&raw);
            observed.sent.push(tx_hash);
            json!(tx_hash)
        }
        "eth_getTransactionReceipt" => {
            let tx_hash: TxHash = serde_json::from_value(params[0].clone()).unwrap();
            let polls = observed.receipt_polls.entry(tx_hash).or_default();
            *polls += 1;
            if *polls <= behaviour.pending_polls {
                Value::Null
            } else {
                receipt(tx_hash, behaviour.status)
            }
        }
        other => {
            return json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": { "code": -32601, "message": format!("method {other} not found") },
            });
        }
    };
    json!({ "jsonrpc": "2.0", "id": request["id"], "result": result })
}

fn receipt(tx_hash: TxHash, status: bool) -> Value {
    json!({
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": "0x0fe66313f8b3f8d88d19ac13b05de0f6e0ef7fcb3293db0869062493ff98f9db",
        "blockNumber": "0x11",
        "from": super::ACCOUNT,
        "to": super::VAULT,
        "contractAddress": null,
        "cumulativeGasUsed": "0x157e6",
        "gasUsed": "0x157e6",
        "effectiveGasPrice": "0x3b9aca00",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "status": if status { "0x1" } else { "0x0" },
        "type": "0x2",
    })
}
