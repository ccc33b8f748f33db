//! Signing credentials derived from a seed.
//!
//! # Security
//! - Seeds are loaded ONLY from environment variables
//! - Seeds and keys are never logged or serialized
//!
//! The signature scheme is fixed for the whole bridge: ECDSA over secp256k1.

use alloy::primitives::{Address, B256};
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use alloy::signers::{Signature, Signer};

use crate::blockchain::types::{ChainError, ChainResult};

/// Identifier of the only signature scheme the bridge signs with.
pub const SIGNATURE_SCHEME: &str = "ecdsa-secp256k1";

/// A key pair able to sign transactions for one account.
#[derive(Clone)]
pub struct Credential {
    signer: PrivateKeySigner,
}

/// Derive a credential from a seed.
///
/// Accepts either a BIP-39 mnemonic (first account on the default derivation
/// path) or a 32-byte hex secret, with or without `0x`.
pub fn derive_credential(seed: &str) -> ChainResult<Credential> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(ChainError::InvalidSeed("empty seed".to_string()));
    }

    let signer = if seed.contains(char::is_whitespace) {
        MnemonicBuilder::<English>::default()
            .phrase(seed)
            .index(0)
            .and_then(|b| b.build())
            .map_err(|e| ChainError::InvalidSeed(format!("Invalid mnemonic: {}", e)))?
    } else {
        let key_hex = seed.strip_prefix("0x").unwrap_or(seed);
        key_hex
            .parse::<PrivateKeySigner>()
            .map_err(|e| ChainError::InvalidSeed(format!("Invalid private key format: {}", e)))?
    };

    tracing::debug!(
        address = %signer.address(),
        scheme = SIGNATURE_SCHEME,
        "Credential derived"
    );

    Ok(Credential { signer })
}

impl Credential {
    /// Derive from the seed held in environment variable `var`.
    pub fn from_env(var: &str) -> ChainResult<Self> {
        let seed = std::env::var(var).map_err(|_| {
            ChainError::InvalidSeed(format!("Environment variable {} not set", var))
        })?;
        derive_credential(&seed)
    }

    /// Account the credential signs for.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte hash.
    pub async fn sign_hash(&self, hash: B256) -> ChainResult<Signature> {
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| ChainError::Encoding(format!("Signing failed: {}", e)))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.address())
            .field("scheme", &SIGNATURE_SCHEME)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development mnemonic and its first account.
    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_derive_from_mnemonic() {
        let credential = derive_credential(TEST_MNEMONIC).unwrap();
        assert_eq!(credential.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_derive_from_hex_with_and_without_prefix() {
        let plain = derive_credential(TEST_PRIVATE_KEY).unwrap();
        let prefixed = derive_credential(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(plain.address(), prefixed.address());
        assert_eq!(plain.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_seeds() {
        for seed in ["", "   ", "not-a-key", "these words are not a valid mnemonic phrase"] {
            let err = derive_credential(seed).unwrap_err();
            assert!(matches!(err, ChainError::InvalidSeed(_)), "seed {:?}", seed);
        }
    }

    #[test]
    fn test_derivations_are_independent() {
        let a = derive_credential(TEST_MNEMONIC).unwrap();
        let b = derive_credential(TEST_MNEMONIC).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_missing_env_var() {
        let err = Credential::from_env("STORAGE_ORDER_BRIDGE_TEST_UNSET_SEED").unwrap_err();
        assert!(err.to_string().contains("not set"));
    }

    #[tokio::test]
    async fn test_sign_hash() {
        let credential = derive_credential(TEST_PRIVATE_KEY).unwrap();
        let hash = B256::repeat_byte(0x11);
        let signature = credential.sign_hash(hash).await.unwrap();
        assert_eq!(signature.as_bytes().len(), 65);
        let recovered = signature.recover_address_from_prehash(&hash).unwrap();
        assert_eq!(recovered, credential.address());
    }
}
