use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use starknet::accounts::{AccountError, AccountFactoryError, SingleOwnerAccount};
use starknet::core::types::{BlockId, BlockTag, Felt, FunctionCall, StarknetError, TransactionStatus};
use starknet::macros::selector;
use starknet::providers::{Provider, ProviderError};
use starknet::signers::LocalWallet;
use thiserror::Error;
use tracing::{error, instrument};

pub mod account;
pub mod balance;
pub mod constants;
pub mod contract;
pub mod keys;
pub mod math;
pub mod transaction;

pub use tracing;

mod network;
pub use network::ChainID;
use gasless_common::{measure_duration, metric};

use crate::client::StarknetClient;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

mod client;

pub type StarknetAccount = SingleOwnerAccount<StarknetClient, LocalWallet>;
pub type ContractAddress = Felt;

#[macro_export]
macro_rules! log_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(ProviderError::StarknetError(error)) => {
                $crate::tracing::warn!(message=%error);
                Err(ProviderError::StarknetError(error))
            }
            Err(error) => {
               $crate::tracing::error!(message=%error);
               Err(error)
            }
        }
    };
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("internal error {0}")]
    Internal(String),

    #[error("configuration error {0}")]
    Configuration(String),

    #[error("identity must not be empty")]
    InvalidIdentity,

    #[error("unknown chain {0}")]
    UnknownChain(String),

    #[error("contract not found")]
    ContractNotFound,

    #[error("contract call returned no value")]
    EmptyResult,

    #[error("execution error {0}")]
    Execution(String),

    #[error("starknet error {0}")]
    Starknet(String),

    #[error("rate limited by the rpc node")]
    RateLimited,

    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    #[error("transaction rejected {0}")]
    TransactionRejected(String),

    #[error("could not confirm transaction after {0} attempts")]
    TransactionTimeout(usize),

    #[error(transparent)]
    Concurrency(#[from] gasless_common::concurrency::Error),
}

impl From<ProviderError> for Error {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::StarknetError(StarknetError::TransactionExecutionError(e)) => Error::Execution(format!("{:?}", e.execution_error)),
            ProviderError::StarknetError(StarknetError::ContractError(e)) => Error::Execution(format!("{:?}", e.revert_error)),
            ProviderError::StarknetError(StarknetError::ContractNotFound) => Error::ContractNotFound,
            ProviderError::Other(e) => Error::Internal(e.to_string()),
            ProviderError::RateLimited => Error::RateLimited,
            e => Error::Starknet(e.to_string()),
        }
    }
}

impl<T: Display + Debug> From<AccountError<T>> for Error {
    fn from(value: AccountError<T>) -> Self {
        match value {
            AccountError::Provider(error) => error.into(),
            e => Error::Starknet(format!("{}", e)),
        }
    }
}

impl<T: Display + Debug> From<AccountFactoryError<T>> for Error {
    fn from(value: AccountFactoryError<T>) -> Self {
        match value {
            AccountFactoryError::Provider(error) => error.into(),
            e => Error::Starknet(format!("{}", e)),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub chain_id: ChainID,
    pub endpoint: String,
    pub timeout: u64,
}

/// Whether code exists at an account address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    Deployed { class_hash: Felt },
    NotDeployed,
}

impl DeploymentStatus {
    pub fn is_deployed(&self) -> bool {
        matches!(self, Self::Deployed { .. })
    }
}

#[derive(Clone)]
pub struct Client {
    chain_id: ChainID,

    inner: StarknetClient,
}

impl Client {
    pub fn new(configuration: &Configuration) -> Result<Self, Error> {
        Ok(Self {
            chain_id: configuration.chain_id,
            inner: client::connect(&configuration.endpoint, configuration.timeout)?,
        })
    }

    /// Returns the chain_id on which this client is bound
    pub fn chain_id(&self) -> &ChainID {
        &self.chain_id
    }

    /// Call `balance_of(recipient)` on the given `token` address
    #[instrument(name = "fetch_balance", skip(self))]
    pub async fn fetch_balance(&self, token: Felt, recipient: Felt) -> Result<Felt, Error> {
        let call = FunctionCall {
            contract_address: token,
            entry_point_selector: selector!("balance_of"),
            calldata: vec![recipient],
        };

        self.call(&call).await?.first().copied().ok_or(Error::EmptyResult)
    }

    /// Check whether an account contract exists at `address`. A missing contract is
    /// reported as [`DeploymentStatus::NotDeployed`]; any other failure is an error.
    #[instrument(name = "check_account_deployment", skip(self), fields(address = %address.to_fixed_hex_string()))]
    pub async fn check_account_deployment(&self, address: ContractAddress) -> Result<DeploymentStatus, Error> {
        let block = BlockId::Tag(BlockTag::PreConfirmed);
        let (result, duration) = measure_duration!(self.inner.get_class_hash_at(block, address).await);

        metric!(histogram[starknet_rpc] = duration.as_millis(), method = "get_class_hash_at");

        match result {
            Ok(class_hash) => Ok(DeploymentStatus::Deployed { class_hash }),
            Err(ProviderError::StarknetError(StarknetError::ContractNotFound)) => Ok(DeploymentStatus::NotDeployed),
            Err(e) => {
                metric!(counter[starknet_rpc_error] = 1, method = "get_class_hash_at");
                error!(message = %e);
                Err(e.into())
            },
        }
    }

    /// Execute the given `call`
    #[instrument(name = "call", skip(self))]
    pub async fn call(&self, call: &FunctionCall) -> Result<Vec<Felt>, Error> {
        let block = BlockId::Tag(BlockTag::PreConfirmed);
        let (result, duration) = measure_duration!(log_if_error!(self.inner.call(call, block).await));

        metric!(histogram[starknet_rpc] = duration.as_millis(), method = "call");
        metric!(on error result => counter [ starknet_rpc_error ] = 1, method = "call");

        Ok(result?)
    }

    /// Returns the status of the transaction with `hash`
    #[instrument(name = "get_transaction_status", skip(self))]
    pub async fn get_transaction_status(&self, hash: Felt) -> Result<TransactionStatus, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.get_transaction_status(hash).await));

        metric!(histogram[starknet_rpc] = duration.as_millis(), method = "get_transaction_status");
        metric!(on error result => counter [ starknet_rpc_error ] = 1, method = "get_transaction_status");

        Ok(result?)
    }
}
