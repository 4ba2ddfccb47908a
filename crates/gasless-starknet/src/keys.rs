use std::fmt::{Debug, Formatter};

use starknet::core::types::Felt;
use starknet::core::utils::starknet_keccak;
use starknet::signers::SigningKey;

use crate::Error;

/// Secret scalar of an account, derived from the identity of the authenticated user.
/// The same identity always yields the same key, so the key is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(Felt);

impl PrivateKey {
    /// Derive the key of `identity`. The keccak output is truncated to 250 bits,
    /// which keeps it below the curve order.
    pub fn derive(identity: &str) -> Result<Self, Error> {
        if identity.is_empty() {
            return Err(Error::InvalidIdentity);
        }

        Ok(Self(starknet_keccak(identity.as_bytes())))
    }

    pub fn secret_scalar(&self) -> Felt {
        self.0
    }

    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_secret_scalar(self.0)
    }

    pub fn public_key(&self) -> Felt {
        self.signing_key().verifying_key().scalar()
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = PrivateKey::derive("did:privy:user-123").unwrap();
        let b = PrivateKey::derive("did:privy:user-123").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn distinct_identities_get_distinct_keys() {
        let a = PrivateKey::derive("user-123").unwrap();
        let b = PrivateKey::derive("user-124").unwrap();

        assert_ne!(a.secret_scalar(), b.secret_scalar());
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn empty_identity_is_rejected() {
        assert!(matches!(PrivateKey::derive(""), Err(Error::InvalidIdentity)));
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let key = PrivateKey::derive("user-123").unwrap();
        let rendered = format!("{:?}", key);

        assert!(!rendered.contains(&key.secret_scalar().to_hex_string()));
    }
}
