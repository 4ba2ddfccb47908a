use starknet::core::types::{Call, Felt, TypedData};
use starknet::signers::SigningKey;
use tracing::{info, instrument};

use crate::types::{
    BuildTransactionRequest, BuildTransactionResponse, DeploymentParameters, ExecutableInvokeParameters, ExecutableTransactionParameters, ExecuteRequest,
    ExecuteResponse, ExecutionParameters, FeeEstimate, FeeMode, InvokeParameters, TimeBounds, TransactionParameters,
};
use crate::{Client, Error};

/// How a paymaster transaction is paid and whether it also deploys the account
#[derive(Debug, Clone)]
pub struct PaymasterDetails {
    pub fee_mode: FeeMode,
    pub deployment_data: Option<DeploymentParameters>,
    pub time_bounds: Option<TimeBounds>,
}

impl PaymasterDetails {
    pub fn sponsored() -> Self {
        Self {
            fee_mode: FeeMode::sponsored(),
            deployment_data: None,
            time_bounds: None,
        }
    }

    pub fn with_deployment(mut self, deployment: DeploymentParameters) -> Self {
        self.deployment_data = Some(deployment);
        self
    }
}

/// Account that submits its calls through a paymaster instead of paying gas itself
pub struct PaymasterAccount {
    client: Client,
    address: Felt,
    signing_key: SigningKey,
}

impl PaymasterAccount {
    pub fn new(client: Client, address: Felt, signing_key: SigningKey) -> Self {
        Self { client, address, signing_key }
    }

    pub fn address(&self) -> Felt {
        self.address
    }

    /// Ask the paymaster to build the transaction and return its fee quote
    #[instrument(name = "estimate_paymaster_transaction_fee", skip_all, fields(address = %self.address.to_fixed_hex_string()))]
    pub async fn estimate_paymaster_transaction_fee(&self, calls: &[Call], details: &PaymasterDetails) -> Result<FeeEstimate, Error> {
        let transaction = self.build(calls, details).await?;

        Ok(transaction.fee().clone())
    }

    /// Build the transaction again, check the quote against `max_fee_in_gas_token`,
    /// sign the returned typed data and hand it to the paymaster for execution.
    #[instrument(name = "execute_paymaster_transaction", skip_all, fields(address = %self.address.to_fixed_hex_string()))]
    pub async fn execute_paymaster_transaction(&self, calls: &[Call], details: &PaymasterDetails, max_fee_in_gas_token: Felt) -> Result<ExecuteResponse, Error> {
        let transaction = self.build(calls, details).await?;

        let fee = transaction.fee().estimated_fee_in_gas_token;
        if fee > max_fee_in_gas_token {
            return Err(Error::MaxFeeExceeded {
                fee,
                max_fee: max_fee_in_gas_token,
            });
        }

        let parameters = transaction.parameters().clone();
        let transaction = match transaction {
            BuildTransactionResponse::Invoke(tx) => ExecutableTransactionParameters::Invoke {
                invoke: self.sign(tx.typed_data)?,
            },
            BuildTransactionResponse::DeployAndInvoke(tx) => ExecutableTransactionParameters::DeployAndInvoke {
                deployment: tx.deployment,
                invoke: self.sign(tx.typed_data)?,
            },
            BuildTransactionResponse::Deploy(_) => return Err(Error::UnexpectedTransaction("deploy")),
        };

        let response = self.client.execute_transaction(ExecuteRequest { transaction, parameters }).await?;
        info!(transaction_hash = %response.transaction_hash.to_fixed_hex_string(), "paymaster transaction submitted");

        Ok(response)
    }

    async fn build(&self, calls: &[Call], details: &PaymasterDetails) -> Result<BuildTransactionResponse, Error> {
        let invoke = InvokeParameters {
            user_address: self.address,
            calls: calls.to_vec(),
        };

        let transaction = match &details.deployment_data {
            Some(deployment) => TransactionParameters::DeployAndInvoke {
                deployment: deployment.clone(),
                invoke,
            },
            None => TransactionParameters::Invoke { invoke },
        };

        let request = BuildTransactionRequest {
            transaction,
            parameters: ExecutionParameters::V1 {
                fee_mode: details.fee_mode.clone(),
                time_bounds: details.time_bounds,
            },
        };

        self.client.build_transaction(request).await
    }

    fn sign(&self, typed_data: TypedData) -> Result<ExecutableInvokeParameters, Error> {
        let hash = typed_data.message_hash(self.address).map_err(|e| Error::Signature(e.to_string()))?;
        let signature = self.signing_key.sign(&hash).map_err(|e| Error::Signature(e.to_string()))?;

        Ok(ExecutableInvokeParameters {
            user_address: self.address,
            typed_data,
            signature: vec![signature.r, signature.s],
        })
    }
}

#[cfg(test)]
mod tests {
    use starknet::core::types::{Call, Felt};
    use starknet::macros::selector;
    use starknet::signers::SigningKey;

    use crate::testing::PaymasterMock;
    use crate::types::DeploymentParameters;
    use crate::{Error, PaymasterAccount, PaymasterDetails};

    fn account(paymaster: &PaymasterMock) -> PaymasterAccount {
        PaymasterAccount::new(paymaster.client(Some("secret")), Felt::from(0x1234u64), SigningKey::from_secret_scalar(Felt::from(0x5678u64)))
    }

    fn increment() -> Vec<Call> {
        vec![Call {
            to: Felt::from(0x42u64),
            selector: selector!("increment"),
            calldata: vec![],
        }]
    }

    fn deployment() -> DeploymentParameters {
        DeploymentParameters {
            address: Felt::from(0x1234u64),
            class_hash: Felt::from(0x99u64),
            salt: Felt::from(0x77u64),
            unique: Felt::ZERO,
            calldata: vec![Felt::ZERO, Felt::from(0x77u64), Felt::ONE],
            sigdata: None,
            version: 1,
        }
    }

    #[tokio::test]
    async fn estimate_returns_the_quote() {
        let paymaster = PaymasterMock::start().await;
        paymaster.mock_build(Felt::from(100u64)).await;

        let fee = account(&paymaster).estimate_paymaster_transaction_fee(&increment(), &PaymasterDetails::sponsored()).await.unwrap();

        assert_eq!(fee.estimated_fee_in_gas_token, Felt::from(100u64));
        assert_eq!(fee.suggested_max_fee_in_gas_token, Felt::from(300u64));
    }

    #[tokio::test]
    async fn execute_signs_the_typed_data() {
        let paymaster = PaymasterMock::start().await;
        paymaster.mock_build(Felt::from(100u64)).await;
        paymaster.mock_execute(Felt::from(0xabcdu64)).await;

        let response = account(&paymaster)
            .execute_paymaster_transaction(&increment(), &PaymasterDetails::sponsored(), Felt::from(300u64))
            .await
            .unwrap();

        assert_eq!(response.transaction_hash, Felt::from(0xabcdu64));

        let executed = paymaster.requests_for("paymaster_executeTransaction").await;
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0]["params"]["transaction"]["type"], "invoke");
        assert_eq!(executed[0]["params"]["transaction"]["invoke"]["signature"].as_array().unwrap().len(), 2);
        assert_eq!(executed[0]["params"]["parameters"]["fee_mode"]["mode"], "sponsored");
    }

    #[tokio::test]
    async fn deployment_data_turns_into_deploy_and_invoke() {
        let paymaster = PaymasterMock::start().await;
        paymaster.mock_build(Felt::from(100u64)).await;
        paymaster.mock_execute(Felt::from(0xabcdu64)).await;

        let details = PaymasterDetails::sponsored().with_deployment(deployment());
        account(&paymaster).execute_paymaster_transaction(&increment(), &details, Felt::from(300u64)).await.unwrap();

        let built = paymaster.requests_for("paymaster_buildTransaction").await;
        assert_eq!(built[0]["params"]["transaction"]["type"], "deploy_and_invoke");
        assert_eq!(built[0]["params"]["transaction"]["deployment"]["version"], 1);

        let executed = paymaster.requests_for("paymaster_executeTransaction").await;
        assert_eq!(executed[0]["params"]["transaction"]["deployment"]["salt"], "0x77");
    }

    #[tokio::test]
    async fn quote_above_maximum_is_not_executed() {
        let paymaster = PaymasterMock::start().await;
        paymaster.mock_build(Felt::from(500u64)).await;
        paymaster.mock_execute(Felt::from(0xabcdu64)).await;

        let result = account(&paymaster).execute_paymaster_transaction(&increment(), &PaymasterDetails::sponsored(), Felt::from(300u64)).await;

        assert!(matches!(result, Err(Error::MaxFeeExceeded { .. })));
        assert!(paymaster.requests_for("paymaster_executeTransaction").await.is_empty());
    }
}
