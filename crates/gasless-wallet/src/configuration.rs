use std::time::Duration;

use gasless_starknet::transaction::WaitConfiguration;
use gasless_starknet::Configuration as StarknetConfiguration;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use starknet::core::serde::unsigned_field_element::UfeHex;
use starknet::core::types::Felt;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymasterEndpoint {
    pub endpoint: String,
    pub timeout: u64,
}

/// Polling used while waiting for a submitted transaction
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ConfirmationConfiguration {
    /// Delay between two status requests, in milliseconds
    pub interval: u64,
    pub max_attempts: usize,
}

impl Default for ConfirmationConfiguration {
    fn default() -> Self {
        let default = WaitConfiguration::default();

        Self {
            interval: default.interval.as_millis() as u64,
            max_attempts: default.max_attempts,
        }
    }
}

impl From<ConfirmationConfiguration> for WaitConfiguration {
    fn from(value: ConfirmationConfiguration) -> Self {
        Self {
            interval: Duration::from_millis(value.interval),
            max_attempts: value.max_attempts,
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Configuration {
    pub starknet: StarknetConfiguration,
    pub paymaster: PaymasterEndpoint,

    /// Default paymaster API key. A key set at runtime takes precedence.
    #[serde(default)]
    pub paymaster_api_key: Option<String>,

    #[serde_as(as = "UfeHex")]
    pub counter_address: Felt,

    /// Period of the background balance refresh
    pub balance_refresh_interval: Duration,

    #[serde(default)]
    pub confirmation: ConfirmationConfiguration,
}

impl Configuration {
    pub fn balance_refresh_interval(&self) -> Duration {
        self.balance_refresh_interval.max(Duration::from_millis(10))
    }
}
