//! Mocked paymaster service for tests of this crate and its dependents.

use serde_json::{json, Value};
use starknet::core::types::Felt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::types::{BuildTransactionRequest, ExecutionParameters, FeeMode, InvokeParameters, TransactionParameters};
use crate::{Client, Configuration};

/// Minimal revision 1 typed data, enough to be hashed and signed
pub fn typed_data() -> Value {
    json!({
        "types": {
            "StarknetDomain": [
                { "name": "name", "type": "shortstring" },
                { "name": "version", "type": "shortstring" },
                { "name": "chainId", "type": "shortstring" },
                { "name": "revision", "type": "shortstring" }
            ],
            "Example": [
                { "name": "n0", "type": "felt" }
            ]
        },
        "primaryType": "Example",
        "domain": { "name": "StarkNet Mail", "version": "1", "chainId": "1", "revision": "1" },
        "message": { "n0": "0x3e8" }
    })
}

pub fn fee_estimate(fee: Felt) -> Value {
    json!({
        "gas_token_price_in_strk": "0x1",
        "estimated_fee_in_strk": fee.to_hex_string(),
        "estimated_fee_in_gas_token": fee.to_hex_string(),
        "suggested_max_fee_in_strk": (fee * Felt::from(3u64)).to_hex_string(),
        "suggested_max_fee_in_gas_token": (fee * Felt::from(3u64)).to_hex_string()
    })
}

pub fn invoke_request() -> BuildTransactionRequest {
    BuildTransactionRequest {
        transaction: TransactionParameters::Invoke {
            invoke: InvokeParameters {
                user_address: Felt::from(0x1234u64),
                calls: vec![],
            },
        },
        parameters: ExecutionParameters::V1 {
            fee_mode: FeeMode::sponsored(),
            time_bounds: None,
        },
    }
}

fn request_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or_default()
}

fn rpc_response(request: &Request, payload: (&str, Value)) -> ResponseTemplate {
    let (key, value) = payload;
    let mut body = json!({ "jsonrpc": "2.0", "id": request_body(request)["id"] });
    body[key] = value;

    ResponseTemplate::new(200).set_body_json(body)
}

/// JSON-RPC success echoing the id of the request it answers
pub fn rpc_result(result: Value) -> impl Respond {
    move |request: &Request| rpc_response(request, ("result", result.clone()))
}

pub fn rpc_error(code: i64, message: &str) -> impl Respond {
    let error = json!({ "code": code, "message": message });
    move |request: &Request| rpc_response(request, ("error", error.clone()))
}

pub struct PaymasterMock {
    server: MockServer,
}

impl PaymasterMock {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn configuration(&self, api_key: Option<&str>) -> Configuration {
        Configuration {
            endpoint: self.server.uri(),
            api_key: api_key.map(str::to_string),
            timeout: 5,
        }
    }

    pub fn client(&self, api_key: Option<&str>) -> Client {
        Client::new(&self.configuration(api_key)).expect("valid mock configuration")
    }

    /// Answer every request with a bare HTTP status, as a gateway would for 401/403/429
    pub async fn mock_http_status(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("{\"error\":\"denied\"}"))
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

    /// Build responses mirror the requested transaction: with deployment data the paymaster
    /// answers a `deploy_and_invoke` transaction, otherwise an `invoke`.
    pub async fn mock_build(&self, fee: Felt) {
        let parameters = json!({ "version": "0x1", "fee_mode": { "mode": "sponsored" }, "time_bounds": null });

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "paymaster_buildTransaction", "params": { "transaction": { "type": "invoke" } } })))
            .respond_with(rpc_result(json!({
                "type": "invoke",
                "typed_data": typed_data(),
                "parameters": parameters,
                "fee": fee_estimate(fee)
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "paymaster_buildTransaction", "params": { "transaction": { "type": "deploy_and_invoke" } } })))
            .respond_with(move |request: &Request| {
                let body = request_body(request);
                let result = json!({
                    "type": "deploy_and_invoke",
                    "deployment": body["params"]["transaction"]["deployment"],
                    "typed_data": typed_data(),
                    "parameters": parameters,
                    "fee": fee_estimate(fee)
                });
                rpc_response(request, ("result", result))
            })
            .mount(&self.server)
            .await;
    }

    pub async fn mock_execute(&self, transaction_hash: Felt) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "paymaster_executeTransaction" })))
            .respond_with(rpc_result(json!({ "transaction_hash": transaction_hash.to_hex_string(), "tracking_id": "0x0" })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of the requests received for the given JSON-RPC method
    pub async fn requests_for(&self, rpc_method: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
            .filter(|body| body["method"] == rpc_method)
            .collect()
    }
}
