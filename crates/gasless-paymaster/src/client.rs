use std::time::Duration;

use gasless_common::{measure_duration, metric};
use jsonrpsee::core::RpcResult;
use jsonrpsee::http_client::{HeaderMap, HeaderValue, HttpClient};
use jsonrpsee::proc_macros::rpc;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::types::{
    BuildTransactionRequest, BuildTransactionResponse, ExecutableTransactionParameters, ExecuteRequest, ExecuteResponse, ExecutionParameters,
    TransactionParameters,
};
use crate::Error;

pub const API_KEY_HEADER: &str = "x-paymaster-api-key";

/// SNIP-29 methods used by the wallet. Parameters are sent by name.
#[rpc(client)]
pub trait PaymasterAPI {
    #[method(name = "paymaster_isAvailable")]
    async fn is_available(&self) -> RpcResult<bool>;

    #[method(name = "paymaster_buildTransaction", param_kind = map)]
    async fn build_transaction(&self, transaction: TransactionParameters, parameters: ExecutionParameters) -> RpcResult<BuildTransactionResponse>;

    #[method(name = "paymaster_executeTransaction", param_kind = map)]
    async fn execute_transaction(&self, transaction: ExecutableTransactionParameters, parameters: ExecutionParameters) -> RpcResult<ExecuteResponse>;
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Configuration {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: u64,
}

/// JSON-RPC client of a SNIP-29 paymaster. The API key, when configured, is sent
/// with every request in the `x-paymaster-api-key` header.
#[derive(Clone)]
pub struct Client {
    inner: HttpClient,
}

impl Client {
    pub fn new(configuration: &Configuration) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &configuration.api_key {
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?);
        }

        let inner = HttpClient::builder()
            .set_headers(headers)
            .request_timeout(Duration::from_secs(configuration.timeout))
            .build(&configuration.endpoint)
            .map_err(|_| Error::InvalidEndpoint(configuration.endpoint.clone()))?;

        Ok(Self { inner })
    }

    #[instrument(name = "paymaster_isAvailable", skip(self))]
    pub async fn is_available(&self) -> Result<bool, Error> {
        let (result, duration) = measure_duration!(self.inner.is_available().await);
        Self::observe("paymaster_isAvailable", duration, result)
    }

    #[instrument(name = "paymaster_buildTransaction", skip_all)]
    pub async fn build_transaction(&self, params: BuildTransactionRequest) -> Result<BuildTransactionResponse, Error> {
        let (result, duration) = measure_duration!(self.inner.build_transaction(params.transaction, params.parameters).await);
        Self::observe("paymaster_buildTransaction", duration, result)
    }

    #[instrument(name = "paymaster_executeTransaction", skip_all)]
    pub async fn execute_transaction(&self, params: ExecuteRequest) -> Result<ExecuteResponse, Error> {
        let (result, duration) = measure_duration!(self.inner.execute_transaction(params.transaction, params.parameters).await);
        Self::observe("paymaster_executeTransaction", duration, result)
    }

    fn observe<T>(method: &str, duration: Duration, result: Result<T, jsonrpsee::core::ClientError>) -> Result<T, Error> {
        let result = result.map_err(Error::from);

        metric!(histogram[paymaster_rpc] = duration.as_millis(), method = method);
        metric!(on error result => counter [ paymaster_rpc_error ] = 1, method = method);

        if let Err(e) = &result {
            warn!(method, "paymaster request failed: {}", e);
        }

        result
    }
}
