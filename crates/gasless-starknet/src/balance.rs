use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use gasless_common::concurrency::ConcurrentExecutor;
use gasless_common::task;
use starknet::core::types::Felt;
use tracing::instrument;

use crate::constants::Token;
use crate::math::format_units;
use crate::{Client, ContractAddress, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub token: Token,
    pub amount: Felt,
}

impl Display for TokenBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", format_units(self.amount, self.token.decimals), self.token.symbol)
    }
}

/// Snapshot of the balances of an account, keyed by token symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances(BTreeMap<&'static str, TokenBalance>);

impl Balances {
    pub fn get(&self, symbol: &str) -> Option<&TokenBalance> {
        self.0.get(symbol)
    }

    pub fn strk(&self) -> Option<&TokenBalance> {
        self.get("STRK")
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenBalance> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TokenBalance> for Balances {
    fn from_iter<T: IntoIterator<Item = TokenBalance>>(iter: T) -> Self {
        Self(iter.into_iter().map(|balance| (balance.token.symbol, balance)).collect())
    }
}

impl Client {
    /// Fetch the balance of `owner` for every token concurrently.
    /// A single failing token fails the whole snapshot.
    #[instrument(name = "fetch_balances", skip(self, tokens), fields(owner = %owner.to_fixed_hex_string()))]
    pub async fn fetch_balances(&self, owner: ContractAddress, tokens: &[Token]) -> Result<Balances, Error> {
        let mut executor = ConcurrentExecutor::new(self.clone(), 4);
        for token in tokens.iter().copied() {
            executor.register(task!(|client| {
                let amount = client.fetch_balance(token.address, owner).await?;
                Ok::<_, Error>(TokenBalance { token, amount })
            }));
        }

        Ok(executor.try_execute().await?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use starknet::core::types::Felt;

    use crate::balance::{Balances, TokenBalance};
    use crate::constants::Token;
    use crate::testing::StarknetNodeMock;
    use crate::ChainID;

    #[test]
    fn balance_renders_with_symbol() {
        let balance = TokenBalance {
            token: Token::strk(&ChainID::Sepolia),
            amount: Felt::from(2_500_000_000_000_000_000u64),
        };

        assert_eq!(balance.to_string(), "2.5 STRK");
    }

    #[tokio::test]
    async fn fetch_every_tracked_token() {
        let node = StarknetNodeMock::start().await;
        let chain = ChainID::Sepolia;
        node.mock_balance(Token::strk(&chain).address, Felt::from(10u64)).await;
        node.mock_balance(Token::eth(&chain).address, Felt::from(3u64)).await;

        let balances: Balances = node.client().fetch_balances(Felt::from(0x1234u64), &Token::tracked(&chain)).await.unwrap();

        assert_eq!(balances.strk().unwrap().amount, Felt::from(10u64));
        assert_eq!(balances.get("ETH").unwrap().amount, Felt::from(3u64));
    }

    #[tokio::test]
    async fn one_failing_token_fails_the_snapshot() {
        let node = StarknetNodeMock::start().await;
        let chain = ChainID::Sepolia;
        node.mock_balance(Token::strk(&chain).address, Felt::from(10u64)).await;
        node.mock_rpc_error("starknet_call", 40, "Contract error").await;

        let result = node.client().fetch_balances(Felt::from(0x1234u64), &Token::tracked(&chain)).await;

        assert!(result.is_err());
    }
}
