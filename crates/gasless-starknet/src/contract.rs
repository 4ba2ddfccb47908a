use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use starknet::core::serde::unsigned_field_element::UfeHex;
use starknet::core::types::{Call, Felt, FunctionCall};
use starknet::macros::selector;
use tracing::instrument;

use crate::{Client, ContractAddress, Error};

/// Counter contract the application increments
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterContract {
    #[serde_as(as = "UfeHex")]
    pub address: ContractAddress,
}

impl CounterContract {
    pub fn new(address: ContractAddress) -> Self {
        Self { address }
    }

    pub fn increment(&self) -> Call {
        Call {
            to: self.address,
            selector: selector!("increment"),
            calldata: vec![],
        }
    }
}

impl Client {
    /// Read the current value of `counter`
    #[instrument(name = "fetch_counter", skip(self))]
    pub async fn fetch_counter(&self, counter: &CounterContract) -> Result<Felt, Error> {
        let call = FunctionCall {
            contract_address: counter.address,
            entry_point_selector: selector!("get_counter"),
            calldata: vec![],
        };

        self.call(&call).await?.first().copied().ok_or(Error::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use starknet::core::types::Felt;
    use starknet::macros::selector;

    use crate::contract::CounterContract;
    use crate::testing::StarknetNodeMock;

    #[test]
    fn increment_has_no_arguments() {
        let counter = CounterContract::new(Felt::from(0x42u64));
        let call = counter.increment();

        assert_eq!(call.to, Felt::from(0x42u64));
        assert_eq!(call.selector, selector!("increment"));
        assert!(call.calldata.is_empty());
    }

    #[tokio::test]
    async fn read_counter_value() {
        let node = StarknetNodeMock::start().await;
        let counter = CounterContract::new(Felt::from(0x42u64));
        node.mock_counter(counter.address, Felt::from(7u64)).await;

        assert_eq!(node.client().fetch_counter(&counter).await.unwrap(), Felt::from(7u64));
    }
}
