use std::path::PathBuf;
use std::time::Duration;

use gasless_starknet::constants::Endpoint;
use gasless_starknet::{ChainID, Configuration as StarknetConfiguration};
use gasless_wallet::{Configuration, ConfirmationConfiguration, PaymasterEndpoint};
use serde::Deserialize;
use starknet::core::types::Felt;

use crate::core::{Error, VerbosityConfiguration};

pub const PREFIX: &str = "GASLESS_";

fn default_rpc_timeout() -> u64 {
    10
}

fn default_balance_refresh_interval() -> u64 {
    10
}

fn default_settings_path() -> PathBuf {
    PathBuf::from(".gasless/settings.json")
}

/// Variables read from the process environment, all prefixed by `GASLESS_`
#[derive(Deserialize, Debug, Clone)]
pub struct Environment {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,

    #[serde(default)]
    pub chain_id: ChainID,

    #[serde(default)]
    pub privy_app_id: Option<String>,
    #[serde(default)]
    pub privy_client_id: Option<String>,

    #[serde(default)]
    pub avnu_api_key: Option<String>,
    #[serde(default)]
    pub paymaster_url: Option<String>,

    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout: u64,
    #[serde(default = "default_balance_refresh_interval")]
    pub balance_refresh_interval: u64,

    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    #[serde(default)]
    pub verbosity: VerbosityConfiguration,
}

impl Environment {
    pub fn load() -> Result<Self, Error> {
        Self::from_variables(std::env::vars())
    }

    pub fn from_variables<I>(variables: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(PREFIX)
            .from_iter(variables)
            .map_err(|e| Error::Configuration(format!("{}: {}", PREFIX, e)))
    }

    pub fn paymaster_url(&self) -> String {
        self.paymaster_url
            .clone()
            .unwrap_or_else(|| Endpoint::default_paymaster_url(&self.chain_id).to_string())
    }

    pub fn configuration(&self) -> Result<Configuration, Error> {
        let rpc_url = self
            .rpc_url
            .clone()
            .ok_or_else(|| Error::Configuration(format!("{}RPC_URL or --rpc-url is required", PREFIX)))?;
        let contract_address = self
            .contract_address
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("{}CONTRACT_ADDRESS or --contract-address is required", PREFIX)))?;
        let counter_address = Felt::from_hex(contract_address).map_err(|_| Error::Configuration(format!("invalid contract address {}", contract_address)))?;

        Ok(Configuration {
            starknet: StarknetConfiguration {
                chain_id: self.chain_id,
                endpoint: rpc_url,
                timeout: self.rpc_timeout,
            },
            paymaster: PaymasterEndpoint {
                endpoint: self.paymaster_url(),
                timeout: self.rpc_timeout,
            },
            paymaster_api_key: self.avnu_api_key.clone().filter(|key| !key.trim().is_empty()),
            counter_address,
            balance_refresh_interval: Duration::from_secs(self.balance_refresh_interval),
            confirmation: ConfirmationConfiguration::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gasless_starknet::ChainID;
    use starknet::core::types::Felt;

    use crate::core::environment::Environment;
    use crate::core::{Error, VerbosityConfiguration};

    fn variables(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_are_applied() {
        let environment = Environment::from_variables(variables(&[
            ("GASLESS_RPC_URL", "http://localhost:5050"),
            ("GASLESS_CONTRACT_ADDRESS", "0x42"),
            ("UNRELATED", "value"),
        ]))
        .unwrap();

        assert_eq!(environment.chain_id, ChainID::Sepolia);
        assert_eq!(environment.rpc_timeout, 10);
        assert_eq!(environment.verbosity, VerbosityConfiguration::Info);
        assert_eq!(environment.paymaster_url(), "https://sepolia.paymaster.avnu.fi");

        let configuration = environment.configuration().unwrap();
        assert_eq!(configuration.counter_address, Felt::from(0x42u64));
        assert_eq!(configuration.balance_refresh_interval, Duration::from_secs(10));
        assert!(configuration.paymaster_api_key.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let environment = Environment::from_variables(variables(&[
            ("GASLESS_RPC_URL", "http://localhost:5050"),
            ("GASLESS_CONTRACT_ADDRESS", "0x42"),
            ("GASLESS_CHAIN_ID", "mainnet"),
            ("GASLESS_AVNU_API_KEY", "secret"),
            ("GASLESS_PAYMASTER_URL", "http://localhost:8080"),
            ("GASLESS_BALANCE_REFRESH_INTERVAL", "30"),
            ("GASLESS_VERBOSITY", "debug"),
        ]))
        .unwrap();

        let configuration = environment.configuration().unwrap();
        assert_eq!(configuration.starknet.chain_id, ChainID::Mainnet);
        assert_eq!(configuration.paymaster.endpoint, "http://localhost:8080");
        assert_eq!(configuration.paymaster_api_key.as_deref(), Some("secret"));
        assert_eq!(configuration.balance_refresh_interval, Duration::from_secs(30));
        assert_eq!(environment.verbosity, VerbosityConfiguration::Debug);
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let environment = Environment::from_variables(variables(&[
            ("GASLESS_RPC_URL", "http://localhost:5050"),
            ("GASLESS_CONTRACT_ADDRESS", "0x42"),
            ("GASLESS_AVNU_API_KEY", "  "),
        ]))
        .unwrap();

        assert!(environment.configuration().unwrap().paymaster_api_key.is_none());
    }

    #[test]
    fn missing_rpc_url_is_rejected_once_resolved() {
        let environment = Environment::from_variables(variables(&[("GASLESS_CONTRACT_ADDRESS", "0x42")])).unwrap();
        assert!(environment.rpc_url.is_none());
        assert!(matches!(environment.configuration(), Err(Error::Configuration(_))));
    }

    #[test]
    fn invalid_contract_address_is_rejected() {
        let environment = Environment::from_variables(variables(&[
            ("GASLESS_RPC_URL", "http://localhost:5050"),
            ("GASLESS_CONTRACT_ADDRESS", "not-an-address"),
        ]))
        .unwrap();

        assert!(environment.configuration().is_err());
    }
}
