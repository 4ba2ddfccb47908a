use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use starknet::accounts::{Account, AccountFactory, ArgentAccountFactory, ExecutionEncoding};
use starknet::core::serde::unsigned_field_element::UfeHex;
use starknet::core::types::{BlockId, BlockTag, Felt};
use starknet::signers::LocalWallet;
use tracing::instrument;

use crate::client::StarknetClient;
use crate::constants::ClassHash;
use crate::keys::PrivateKey;
use crate::{Client, Error, StarknetAccount};

/// Everything needed to deploy an Argent account at its counterfactual address.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgentDeployment {
    #[serde_as(as = "UfeHex")]
    pub address: Felt,

    #[serde_as(as = "UfeHex")]
    pub class_hash: Felt,

    #[serde_as(as = "UfeHex")]
    pub salt: Felt,

    #[serde_as(as = "Vec<UfeHex>")]
    pub calldata: Vec<Felt>,
}

/// Account of the current session, bound to its derived key
pub struct AccountHandle {
    account: StarknetAccount,
    deployment: ArgentDeployment,
    private_key: PrivateKey,
}

impl AccountHandle {
    pub fn address(&self) -> Felt {
        self.account.address()
    }

    pub fn public_key(&self) -> Felt {
        self.private_key.public_key()
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn deployment(&self) -> &ArgentDeployment {
        &self.deployment
    }

    pub fn account(&self) -> &StarknetAccount {
        &self.account
    }
}

impl std::fmt::Debug for AccountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountHandle")
            .field("address", &self.address().to_fixed_hex_string())
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl Client {
    async fn argent_factory(&self, private_key: &PrivateKey) -> Result<ArgentAccountFactory<LocalWallet, StarknetClient>, Error> {
        let signer = LocalWallet::from(private_key.signing_key());

        ArgentAccountFactory::new(ClassHash::ARGENT_ACCOUNT, self.chain_id.as_felt(), None, signer, self.inner.clone())
            .await
            .map_err(|e| Error::Internal(e.to_string()))
    }

    /// Compute the counterfactual address of the Argent account owned by `private_key`
    /// and bind an account to it. The salt is the public key and there is no guardian.
    /// Nothing is sent to the network.
    pub async fn initialize_account(&self, private_key: PrivateKey) -> Result<AccountHandle, Error> {
        let factory = self.argent_factory(&private_key).await?;

        let salt = private_key.public_key();
        let deployment = ArgentDeployment {
            address: factory.deploy_v3(salt).address(),
            class_hash: factory.class_hash(),
            salt,
            calldata: factory.calldata(),
        };

        let signer = LocalWallet::from(private_key.signing_key());
        let mut account = StarknetAccount::new(self.inner.clone(), signer, deployment.address, self.chain_id.as_felt(), ExecutionEncoding::New);
        account.set_block_id(BlockId::Tag(BlockTag::PreConfirmed));

        Ok(AccountHandle {
            account,
            deployment,
            private_key,
        })
    }

    /// Send a deploy-account transaction for `handle`, paid by the account itself.
    /// Returns the transaction hash.
    #[instrument(name = "deploy_account", skip(self, handle), fields(address = %handle.address().to_fixed_hex_string()))]
    pub async fn deploy_account(&self, handle: &AccountHandle) -> Result<Felt, Error> {
        let factory = self.argent_factory(handle.private_key()).await?;

        let result = factory.deploy_v3(handle.deployment.salt).send().await?;

        Ok(result.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::PrivateKey;
    use crate::{ChainID, Client, Configuration};

    fn client() -> Client {
        Client::new(&Configuration {
            chain_id: ChainID::Sepolia,
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn same_identity_same_address() {
        let client = client();

        let a = client.initialize_account(PrivateKey::derive("user-123").unwrap()).await.unwrap();
        let b = client.initialize_account(PrivateKey::derive("user-123").unwrap()).await.unwrap();

        assert_eq!(a.address(), b.address());
        assert_eq!(a.deployment(), b.deployment());
    }

    #[tokio::test]
    async fn distinct_identities_distinct_addresses() {
        let client = client();

        let a = client.initialize_account(PrivateKey::derive("user-123").unwrap()).await.unwrap();
        let b = client.initialize_account(PrivateKey::derive("user-456").unwrap()).await.unwrap();

        assert_ne!(a.address(), b.address());
    }

    #[tokio::test]
    async fn deployment_is_salted_with_the_public_key() {
        let key = PrivateKey::derive("user-123").unwrap();
        let handle = client().initialize_account(key.clone()).await.unwrap();

        assert_eq!(handle.deployment().salt, key.public_key());
        assert_eq!(handle.deployment().address, handle.address());
        assert!(handle.deployment().calldata.contains(&key.public_key()));
    }
}
