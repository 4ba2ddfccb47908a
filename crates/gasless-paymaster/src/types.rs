//! Request and response payloads of the `paymaster_*` JSON-RPC methods.

use gasless_common::enum_dispatch;
use gasless_starknet::account::ArgentDeployment;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use starknet::core::serde::unsigned_field_element::UfeHex;
use starknet::core::types::{Call, Felt, TypedData};

/// Data the paymaster needs to deploy the account in the same sponsored transaction
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParameters {
    #[serde_as(as = "UfeHex")]
    pub address: Felt,

    #[serde_as(as = "UfeHex")]
    pub class_hash: Felt,

    #[serde_as(as = "UfeHex")]
    pub salt: Felt,

    #[serde_as(as = "UfeHex")]
    #[serde(default)]
    pub unique: Felt,

    #[serde_as(as = "Vec<UfeHex>")]
    pub calldata: Vec<Felt>,

    #[serde_as(as = "Option<Vec<UfeHex>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigdata: Option<Vec<Felt>>,

    pub version: u8,
}

impl From<&ArgentDeployment> for DeploymentParameters {
    fn from(value: &ArgentDeployment) -> Self {
        Self {
            address: value.address,
            class_hash: value.class_hash,
            salt: value.salt,
            unique: Felt::ZERO,
            calldata: value.calldata.clone(),
            sigdata: None,
            version: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "version")]
pub enum ExecutionParameters {
    #[serde(rename = "0x1")]
    V1 { fee_mode: FeeMode, time_bounds: Option<TimeBounds> },
}

impl ExecutionParameters {
    pub fn fee_mode(&self) -> &FeeMode {
        match self {
            Self::V1 { fee_mode, .. } => fee_mode,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub execute_after: u64,
    pub execute_before: u64,
}

#[derive(Serialize, Deserialize, Copy, Default, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TipPriority {
    Slow,
    #[default]
    Normal,
    Fast,
    Custom(u64),
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeeMode {
    /// The user pays the fee in `gas_token`
    Default {
        #[serde_as(as = "UfeHex")]
        gas_token: Felt,
        #[serde(default)]
        tip: TipPriority,
    },
    /// The paymaster pays the fee on behalf of the user
    Sponsored {
        #[serde(default)]
        tip: TipPriority,
    },
}

impl FeeMode {
    pub fn sponsored() -> Self {
        Self::Sponsored { tip: TipPriority::default() }
    }

    pub fn is_sponsored(&self) -> bool {
        matches!(self, Self::Sponsored { .. })
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvokeParameters {
    #[serde_as(as = "UfeHex")]
    pub user_address: Felt,
    pub calls: Vec<Call>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionParameters {
    Deploy { deployment: DeploymentParameters },
    Invoke { invoke: InvokeParameters },
    DeployAndInvoke { deployment: DeploymentParameters, invoke: InvokeParameters },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BuildTransactionRequest {
    pub transaction: TransactionParameters,
    pub parameters: ExecutionParameters,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildTransactionResponse {
    Deploy(DeployTransaction),
    Invoke(InvokeTransaction),
    DeployAndInvoke(DeployAndInvokeTransaction),
}

impl BuildTransactionResponse {
    pub fn fee(&self) -> &FeeEstimate {
        enum_dispatch!(self {
            Self::Deploy(tx) => &tx.fee,
            Self::Invoke(tx) => &tx.fee,
            Self::DeployAndInvoke(tx) => &tx.fee
        })
    }

    pub fn parameters(&self) -> &ExecutionParameters {
        enum_dispatch!(self {
            Self::Deploy(tx) => &tx.parameters,
            Self::Invoke(tx) => &tx.parameters,
            Self::DeployAndInvoke(tx) => &tx.parameters
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deploy(_) => "deploy",
            Self::Invoke(_) => "invoke",
            Self::DeployAndInvoke(_) => "deploy_and_invoke",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeployTransaction {
    pub deployment: DeploymentParameters,
    pub parameters: ExecutionParameters,
    pub fee: FeeEstimate,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvokeTransaction {
    pub typed_data: TypedData,
    pub parameters: ExecutionParameters,
    pub fee: FeeEstimate,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeployAndInvokeTransaction {
    pub deployment: DeploymentParameters,
    pub typed_data: TypedData,
    pub parameters: ExecutionParameters,
    pub fee: FeeEstimate,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeEstimate {
    #[serde_as(as = "UfeHex")]
    pub gas_token_price_in_strk: Felt,
    #[serde_as(as = "UfeHex")]
    pub estimated_fee_in_strk: Felt,
    #[serde_as(as = "UfeHex")]
    pub estimated_fee_in_gas_token: Felt,
    #[serde_as(as = "UfeHex")]
    pub suggested_max_fee_in_strk: Felt,
    #[serde_as(as = "UfeHex")]
    pub suggested_max_fee_in_gas_token: Felt,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone)]
pub struct ExecutableInvokeParameters {
    #[serde_as(as = "UfeHex")]
    pub user_address: Felt,

    pub typed_data: TypedData,

    #[serde_as(as = "Vec<UfeHex>")]
    pub signature: Vec<Felt>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutableTransactionParameters {
    Deploy {
        deployment: DeploymentParameters,
    },
    Invoke {
        invoke: ExecutableInvokeParameters,
    },
    DeployAndInvoke {
        deployment: DeploymentParameters,
        invoke: ExecutableInvokeParameters,
    },
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ExecuteRequest {
    pub transaction: ExecutableTransactionParameters,
    pub parameters: ExecutionParameters,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecuteResponse {
    #[serde_as(as = "UfeHex")]
    pub transaction_hash: Felt,

    #[serde_as(as = "UfeHex")]
    pub tracking_id: Felt,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use starknet::core::types::Felt;

    use super::*;

    #[test]
    fn sponsored_fee_mode_is_tagged_by_mode() {
        let parameters = ExecutionParameters::V1 {
            fee_mode: FeeMode::sponsored(),
            time_bounds: None,
        };

        let value = serde_json::to_value(&parameters).unwrap();
        assert_eq!(value["version"], "0x1");
        assert_eq!(value["fee_mode"]["mode"], "sponsored");

        let parsed: ExecutionParameters = serde_json::from_value(json!({ "version": "0x1", "fee_mode": { "mode": "sponsored" }, "time_bounds": null })).unwrap();
        assert!(parsed.fee_mode().is_sponsored());
    }

    #[test]
    fn deployment_data_comes_from_the_argent_deployment() {
        let deployment = ArgentDeployment {
            address: Felt::from(0x1u64),
            class_hash: Felt::from(0x2u64),
            salt: Felt::from(0x3u64),
            calldata: vec![Felt::ZERO, Felt::from(0x3u64), Felt::ONE],
        };

        let parameters = DeploymentParameters::from(&deployment);
        let value = serde_json::to_value(&parameters).unwrap();

        assert_eq!(value["address"], "0x1");
        assert_eq!(value["unique"], "0x0");
        assert_eq!(value["version"], 1);
        assert_eq!(value["calldata"], json!(["0x0", "0x3", "0x1"]));
        assert!(value.get("sigdata").is_none());
    }

    #[test]
    fn invoke_transaction_is_tagged_by_type() {
        let transaction = TransactionParameters::Invoke {
            invoke: InvokeParameters {
                user_address: Felt::from(0x1u64),
                calls: vec![],
            },
        };

        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["type"], "invoke");
        assert_eq!(value["invoke"]["user_address"], "0x1");
    }
}
