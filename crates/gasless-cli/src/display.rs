use gasless_starknet::balance::Balances;
use gasless_starknet::constants::Endpoint;
use gasless_starknet::ChainID;
use starknet::core::types::Felt;

/// `0x1234...abcd`
pub fn short_address(address: &Felt) -> String {
    let hex = address.to_fixed_hex_string();
    format!("{}...{}", &hex[..6], &hex[hex.len() - 4..])
}

/// First ten characters of a transaction hash
pub fn short_hash(hash: &Felt) -> String {
    let hex = hash.to_fixed_hex_string();
    format!("{}...", &hex[..10])
}

pub fn transaction_link(chain_id: &ChainID, hash: &Felt) -> String {
    format!("{}/tx/{}", Endpoint::explorer_url(chain_id), hash.to_fixed_hex_string())
}

pub fn contract_link(chain_id: &ChainID, address: &Felt) -> String {
    format!("{}/contract/{}", Endpoint::explorer_url(chain_id), address.to_fixed_hex_string())
}

pub fn balances(balances: Option<&Balances>) -> String {
    match balances {
        Some(balances) if !balances.is_empty() => balances.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use gasless_starknet::balance::{Balances, TokenBalance};
    use gasless_starknet::constants::Token;
    use gasless_starknet::ChainID;
    use starknet::core::types::Felt;

    use super::*;

    #[test]
    fn address_is_shortened() {
        let address = Felt::from_hex("0x1234567890abcdef").unwrap();
        assert_eq!(short_address(&address), "0x0000...cdef");

        let address = Felt::from_hex("0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(short_address(&address), "0x0123...cdef");
    }

    #[test]
    fn hash_is_shortened() {
        let hash = Felt::from_hex("0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(short_hash(&hash), "0x01234567...");
    }

    #[test]
    fn links_target_the_network_explorer() {
        let hash = Felt::from(1u64);
        assert!(transaction_link(&ChainID::Sepolia, &hash).starts_with("https://sepolia.voyager.online/tx/0x000"));
        assert!(contract_link(&ChainID::Mainnet, &hash).starts_with("https://voyager.online/contract/0x000"));
    }

    #[test]
    fn balances_are_listed_with_their_symbol() {
        let chain = ChainID::Sepolia;
        let snapshot: Balances = vec![
            TokenBalance {
                token: Token::strk(&chain),
                amount: Felt::from(2_500_000_000_000_000_000u64),
            },
            TokenBalance {
                token: Token::eth(&chain),
                amount: Felt::ZERO,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(balances(Some(&snapshot)), "0 ETH, 2.5 STRK");
        assert_eq!(balances(None), "unknown");
    }
}
