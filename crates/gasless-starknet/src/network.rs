use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use starknet::core::chain_id::{MAINNET, SEPOLIA};
use starknet::core::types::Felt;

use crate::Error;

/// Starknet network the application talks to
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainID {
    #[default]
    Sepolia,
    Mainnet,
}

impl ChainID {
    /// Short string identifier used in typed data domains
    /// - ChainID::Sepolia -> "SN_SEPOLIA"
    /// - ChainID::Mainnet -> "SN_MAIN"
    pub fn as_identifier(&self) -> &'static str {
        match self {
            Self::Sepolia => "SN_SEPOLIA",
            Self::Mainnet => "SN_MAIN",
        }
    }

    pub fn from_felt(value: Felt) -> Result<Self, Error> {
        if value == SEPOLIA {
            Ok(Self::Sepolia)
        } else if value == MAINNET {
            Ok(Self::Mainnet)
        } else {
            Err(Error::UnknownChain(value.to_hex_string()))
        }
    }

    pub fn as_felt(&self) -> Felt {
        match self {
            Self::Sepolia => SEPOLIA,
            Self::Mainnet => MAINNET,
        }
    }
}

impl FromStr for ChainID {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sepolia" | "sn_sepolia" => Ok(Self::Sepolia),
            "mainnet" | "main" | "sn_main" | "sn_mainnet" => Ok(Self::Mainnet),
            _ => Err(Error::UnknownChain(s.to_string())),
        }
    }
}

impl Display for ChainID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sepolia => write!(f, "sepolia"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("Sepolia".parse::<ChainID>().unwrap(), ChainID::Sepolia);
        assert_eq!("SN_SEPOLIA".parse::<ChainID>().unwrap(), ChainID::Sepolia);
        assert_eq!("SN_MAIN".parse::<ChainID>().unwrap(), ChainID::Mainnet);
        assert!("goerli".parse::<ChainID>().is_err());
    }

    #[test]
    fn felt_round_trip() {
        for chain in [ChainID::Sepolia, ChainID::Mainnet] {
            assert_eq!(ChainID::from_felt(chain.as_felt()).unwrap(), chain);
        }
    }
}
