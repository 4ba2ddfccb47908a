use std::time::Duration;

use starknet::core::types::{ExecutionResult, Felt, TransactionStatus};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::{Client, Error};

/// Polling policy used while waiting for a transaction to be accepted
#[derive(Debug, Clone, Copy)]
pub struct WaitConfiguration {
    pub interval: Duration,
    pub max_attempts: usize,
}

impl Default for WaitConfiguration {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
            max_attempts: 45,
        }
    }
}

impl Client {
    /// Poll the status of `hash` until it is accepted on L2 or L1. Transient RPC errors
    /// and unknown hashes are retried; a reverted or rejected transaction is an error.
    #[instrument(name = "wait_for_transaction", skip(self, configuration), fields(hash = %hash.to_fixed_hex_string()))]
    pub async fn wait_for_transaction(&self, hash: Felt, configuration: &WaitConfiguration) -> Result<(), Error> {
        for attempt in 0..configuration.max_attempts {
            match self.get_transaction_status(hash).await {
                Ok(TransactionStatus::AcceptedOnL2(ExecutionResult::Succeeded) | TransactionStatus::AcceptedOnL1(ExecutionResult::Succeeded)) => {
                    info!("transaction accepted");
                    return Ok(());
                },
                Ok(TransactionStatus::AcceptedOnL2(ExecutionResult::Reverted { reason }) | TransactionStatus::AcceptedOnL1(ExecutionResult::Reverted { reason })) => {
                    return Err(Error::TransactionReverted(reason));
                },
                Ok(TransactionStatus::Rejected { .. }) => {
                    return Err(Error::TransactionRejected(hash.to_fixed_hex_string()));
                },
                Ok(TransactionStatus::Received) => debug!(attempt, "transaction received"),
                Err(e) => debug!(attempt, "transaction status unavailable: {}", e),
            }

            sleep(configuration.interval).await;
        }

        Err(Error::TransactionTimeout(configuration.max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use starknet::core::types::Felt;

    use crate::testing::StarknetNodeMock;
    use crate::transaction::WaitConfiguration;
    use crate::Error;

    const FAST: WaitConfiguration = WaitConfiguration {
        interval: Duration::from_millis(1),
        max_attempts: 3,
    };

    #[tokio::test]
    async fn accepted_transaction_succeeds() {
        let node = StarknetNodeMock::start().await;
        node.mock_transaction_status("ACCEPTED_ON_L2", "SUCCEEDED").await;

        assert!(node.client().wait_for_transaction(Felt::from(0xabcu64), &FAST).await.is_ok());
    }

    #[tokio::test]
    async fn reverted_transaction_fails() {
        let node = StarknetNodeMock::start().await;
        node.mock_transaction_status("ACCEPTED_ON_L2", "REVERTED").await;

        let result = node.client().wait_for_transaction(Felt::from(0xabcu64), &FAST).await;
        assert!(matches!(result, Err(Error::TransactionReverted(_))));
    }

    #[tokio::test]
    async fn unknown_transaction_times_out() {
        let node = StarknetNodeMock::start().await;
        node.mock_rpc_error("starknet_getTransactionStatus", 29, "Transaction hash not found").await;

        let result = node.client().wait_for_transaction(Felt::from(0xabcu64), &FAST).await;
        assert!(matches!(result, Err(Error::TransactionTimeout(3))));
    }
}
