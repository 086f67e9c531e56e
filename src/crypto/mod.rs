//! Cryptographic Primitives Module
//!
//! - secp256k1 keys and Ethereum address derivation
//! - deterministic recoverable signatures over transaction hashes

use sha3::{Digest, Keccak256};

pub mod keys;
pub mod signer;

// Re-export main types
pub use keys::{
    address_from_public, address_from_secret, derive_address, generate_account,
    parse_private_key, Account,
};
pub use signer::{recover_signer, sign, sign_hash, SignedTransaction, SIGNATURE_LEN};

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_input() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
