//! Mocked Starknet JSON-RPC node for tests of this crate and its dependents.

use serde_json::{json, Value};
use starknet::core::types::Felt;
use starknet::macros::selector;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{ChainID, Client, Configuration};

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

pub fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": code, "message": message } }))
}

pub struct StarknetNodeMock {
    server: MockServer,
}

impl StarknetNodeMock {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn configuration(&self) -> Configuration {
        Configuration {
            chain_id: ChainID::Sepolia,
            endpoint: self.server.uri(),
            timeout: 5,
        }
    }

    pub fn client(&self) -> Client {
        Client::new(&self.configuration()).expect("valid mock configuration")
    }

    /// `Some(class)` for a deployed account, `None` for the "contract not found" error
    pub async fn mock_class_hash_at(&self, class_hash: Option<Felt>) {
        let response = match class_hash {
            Some(class_hash) => rpc_result(json!(class_hash.to_hex_string())),
            None => rpc_error(20, "Contract not found"),
        };

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "starknet_getClassHashAt" })))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_balance(&self, token: Felt, amount: Felt) {
        self.mock_call(token, selector!("balance_of"), vec![amount, Felt::ZERO]).await
    }

    pub async fn mock_counter(&self, counter: Felt, value: Felt) {
        self.mock_call(counter, selector!("get_counter"), vec![value]).await
    }

    pub async fn mock_call(&self, contract: Felt, selector: Felt, result: Vec<Felt>) {
        let result: Vec<String> = result.iter().map(Felt::to_hex_string).collect();

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "starknet_call",
                "params": {
                    "request": {
                        "contract_address": contract.to_hex_string(),
                        "entry_point_selector": selector.to_hex_string()
                    }
                }
            })))
            .respond_with(rpc_result(json!(result)))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_transaction_status(&self, finality_status: &str, execution_status: &str) {
        let mut status = json!({ "finality_status": finality_status, "execution_status": execution_status });
        if execution_status == "REVERTED" {
            status["failure_reason"] = json!("assertion failed");
        }

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "starknet_getTransactionStatus" })))
            .respond_with(rpc_result(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_rpc_error(&self, rpc_method: &str, code: i64, message: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(rpc_error(code, message))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for the given JSON-RPC method
    pub async fn requests_for(&self, rpc_method: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
            .filter(|body| body["method"] == rpc_method)
            .count()
    }

    pub async fn reset(&self) {
        self.server.reset().await
    }
}
