//! Key handling and address derivation
//!
//! Ethereum style accounts: a secp256k1 secret key and the address formed by the
//! last 20 bytes of `keccak256` over the uncompressed public key.

use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use web3::types::Address;

use crate::crypto::keccak256;
use crate::error::ValidationError;

/// Freshly generated keypair
#[derive(Debug, Clone)]
pub struct Account {
    pub private_key: SecretKey,
    pub address: Address,
}

impl Account {
    /// Hex encoded private key with `0x` prefix
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.private_key.secret_bytes()))
    }
}

/// Parse a hex private key, with or without `0x`
pub fn parse_private_key(value: &str) -> Result<SecretKey, ValidationError> {
    let trimmed = value.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(hex_part)
        .map_err(|e| ValidationError::InvalidKey(format!("not hex: {}", e)))?;
    if bytes.len() != 32 {
        return Err(ValidationError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    SecretKey::from_slice(&bytes).map_err(|e| ValidationError::InvalidKey(e.to_string()))
}

/// Address controlled by a secret key
pub fn address_from_secret(secret_key: &SecretKey) -> Address {
    let secp = Secp256k1::signing_only();
    let public_key = PublicKey::from_secret_key(&secp, secret_key);
    address_from_public(&public_key)
}

/// Address of a public key
pub fn address_from_public(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    // Skip the 0x04 prefix
    let hash = keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}

/// Derive the address of a hex encoded private key
pub fn derive_address(private_key: &str) -> Result<Address, ValidationError> {
    let secret_key = parse_private_key(private_key)?;
    Ok(address_from_secret(&secret_key))
}

/// Generate a random account from the thread RNG
pub fn generate_account() -> Account {
    let mut rng = rand::thread_rng();
    let mut bytes = [0u8; 32];
    loop {
        rng.fill_bytes(&mut bytes);
        // Out of range scalars are astronomically rare, draw again
        if let Ok(private_key) = SecretKey::from_slice(&bytes) {
            let address = address_from_secret(&private_key);
            return Account {
                private_key,
                address,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // Well known development account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "f39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_derive_known_address() {
        let address = derive_address(DEV_KEY).unwrap();
        assert_eq!(address, Address::from_str(DEV_ADDRESS).unwrap());

        let without_prefix = derive_address(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(without_prefix, address);
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(derive_address("0xzz"), Err(ValidationError::InvalidKey(_))));
        assert!(matches!(derive_address("0x1234"), Err(ValidationError::InvalidKey(_))));
        // Zero is not a valid scalar
        let zero = format!("0x{}", "00".repeat(32));
        assert!(matches!(derive_address(&zero), Err(ValidationError::InvalidKey(_))));
        // Neither is the curve order
        let order = "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(matches!(derive_address(order), Err(ValidationError::InvalidKey(_))));
    }

    #[test]
    fn test_generated_account_round_trips() {
        let account = generate_account();
        let derived = derive_address(&account.private_key_hex()).unwrap();
        assert_eq!(derived, account.address);
    }
}
