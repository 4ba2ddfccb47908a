use starknet::core::types::Felt;
use starknet::macros::felt;

use crate::ChainID;

pub struct ClassHash;

impl ClassHash {
    /// Argent account class used for every derived account
    pub const ARGENT_ACCOUNT: Felt = felt!("0x036078334509b514626504edc9fb252328d1a240e4e948bef8d0c08dff45927f");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub decimals: u32,
    pub address: Felt,
}

impl Token {
    pub const fn eth(chain_id: &ChainID) -> Token {
        match chain_id {
            ChainID::Sepolia | ChainID::Mainnet => Token {
                symbol: "ETH",
                decimals: 18,
                address: felt!("0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7"),
            },
        }
    }

    pub const fn strk(chain_id: &ChainID) -> Token {
        match chain_id {
            ChainID::Sepolia | ChainID::Mainnet => Token {
                symbol: "STRK",
                decimals: 18,
                address: felt!("0x4718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d"),
            },
        }
    }

    /// Tokens whose balance is tracked for an account
    pub fn tracked(chain_id: &ChainID) -> Vec<Token> {
        vec![Self::strk(chain_id), Self::eth(chain_id)]
    }
}

pub struct Endpoint;

impl Endpoint {
    pub const fn default_rpc_url(chain_id: &ChainID) -> &'static str {
        match chain_id {
            ChainID::Sepolia => "https://starknet-sepolia.public.blastapi.io/rpc/v0_9",
            ChainID::Mainnet => "https://starknet-mainnet.public.blastapi.io/rpc/v0_9",
        }
    }

    pub const fn default_paymaster_url(chain_id: &ChainID) -> &'static str {
        match chain_id {
            ChainID::Sepolia => "https://sepolia.paymaster.avnu.fi",
            ChainID::Mainnet => "https://starknet.paymaster.avnu.fi",
        }
    }

    pub const fn explorer_url(chain_id: &ChainID) -> &'static str {
        match chain_id {
            ChainID::Sepolia => "https://sepolia.voyager.online",
            ChainID::Mainnet => "https://voyager.online",
        }
    }
}
