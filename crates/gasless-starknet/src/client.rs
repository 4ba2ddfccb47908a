use std::time::Duration;

use starknet::providers::jsonrpc::HttpTransport;
use starknet::providers::{JsonRpcClient, Url};

use crate::Error;

pub type StarknetClient = JsonRpcClient<HttpTransport>;

/// Build a JSON-RPC client on `endpoint`. `timeout` bounds each request, in seconds.
pub fn connect(endpoint: &str, timeout: u64) -> Result<StarknetClient, Error> {
    let url = Url::parse(endpoint).map_err(|e| Error::Configuration(format!("invalid rpc url {}: {}", endpoint, e)))?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .connect_timeout(Duration::from_secs(5))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .build()
        .map_err(|e| Error::Configuration(format!("could not build http client: {}", e)))?;

    Ok(JsonRpcClient::new(HttpTransport::new_with_client(url, http)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let result = connect("not a url", 10);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn valid_url_builds_without_network() {
        assert!(connect("http://127.0.0.1:5050/rpc", 10).is_ok());
    }
}
