//! Transaction signing
//!
//! Signatures are 65 byte recoverable secp256k1 signatures `r || s || v` over the
//! keccak256 hash of the unsigned encoding, with `v` in `{27, 28}`. Nonces follow
//! RFC 6979, so the same transaction and key always give the same bytes.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, SecretKey};
use web3::types::Address;

use crate::crypto::keys::address_from_public;
use crate::error::ValidationError;
use crate::transaction::{encode_signed, signing_hash, Transaction};

/// Length of an encoded signature
pub const SIGNATURE_LEN: usize = 65;

/// Transaction together with its owner signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: [u8; SIGNATURE_LEN],
}

impl SignedTransaction {
    /// Bytes accepted by the watcher's submit endpoint
    pub fn encode(&self) -> Vec<u8> {
        // Every input belongs to the signer, so each carries the same signature
        let signatures = vec![self.signature.to_vec(); self.transaction.inputs().len()];
        encode_signed(
            &signatures,
            self.transaction.input_positions(),
            self.transaction.outputs(),
        )
    }

    /// `0x` prefixed hex of [`SignedTransaction::encode`]
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Hash that was signed
    pub fn hash(&self) -> [u8; 32] {
        signing_hash(self.transaction.input_positions(), self.transaction.outputs())
    }
}

/// Sign a 32 byte hash
pub fn sign_hash(hash: &[u8; 32], secret_key: &SecretKey) -> [u8; SIGNATURE_LEN] {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*hash);
    let signature = secp.sign_ecdsa_recoverable(&message, secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut bytes = [0u8; SIGNATURE_LEN];
    bytes[..64].copy_from_slice(&compact);
    bytes[64] = recovery_id.to_i32() as u8 + 27;
    bytes
}

/// Sign a built transaction
pub fn sign(transaction: Transaction, secret_key: &SecretKey) -> SignedTransaction {
    let hash = signing_hash(transaction.input_positions(), transaction.outputs());
    let signature = sign_hash(&hash, secret_key);
    log::debug!("signed transaction hash 0x{}", hex::encode(hash));

    SignedTransaction {
        transaction,
        signature,
    }
}

/// Recover the address that produced `signature` over `hash`
pub fn recover_signer(
    hash: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<Address, ValidationError> {
    let v = signature[64];
    if v != 27 && v != 28 {
        return Err(ValidationError::InvalidKey(format!("bad recovery byte {}", v)));
    }
    let recovery_id = RecoveryId::from_i32(i32::from(v - 27))
        .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let public_key = secp
        .recover_ecdsa(&Message::from_digest(*hash), &recoverable)
        .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;
    Ok(address_from_public(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{address_from_secret, parse_private_key};
    use crate::transaction::test_utils::{address, utxo};
    use crate::transaction::{build, TransactionIntent};
    use crate::utxo::ETH_CURRENCY;

    const KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn transfer(owner: Address) -> Transaction {
        build(TransactionIntent::Transfer {
            input: utxo(1000, 0, owner, ETH_CURRENCY, 100),
            from: owner,
            to: address(2),
            amount: 60,
        })
        .unwrap()
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = parse_private_key(KEY).unwrap();
        let owner = address_from_secret(&key);

        let first = sign(transfer(owner), &key);
        let second = sign(transfer(owner), &key);
        assert_eq!(first.signature, second.signature);
        assert_eq!(first.encode(), second.encode());
    }

    #[test]
    fn test_signature_recovers_owner() {
        let key = parse_private_key(KEY).unwrap();
        let owner = address_from_secret(&key);

        let signed = sign(transfer(owner), &key);
        assert!(signed.signature[64] == 27 || signed.signature[64] == 28);
        assert_eq!(recover_signer(&signed.hash(), &signed.signature).unwrap(), owner);
    }

    #[test]
    fn test_one_signature_per_input() {
        let key = parse_private_key(KEY).unwrap();
        let owner = address_from_secret(&key);
        let merge = build(TransactionIntent::Merge {
            inputs: vec![
                utxo(1000, 0, owner, ETH_CURRENCY, 40),
                utxo(2000, 0, owner, ETH_CURRENCY, 60),
                utxo(3000, 1, owner, ETH_CURRENCY, 5),
            ],
            owner,
        })
        .unwrap();

        let signed = sign(merge, &key);
        let encoded = signed.encode();
        let sigs: Vec<Vec<u8>> = rlp::Rlp::new(&encoded).list_at(0).unwrap();
        assert_eq!(sigs.len(), 3);
        assert!(signed.encode_hex().starts_with("0x"));
    }
}
