//! Canonical transaction encoding
//!
//! Unsigned form: `rlp([inputs, outputs])` where `inputs` is always four
//! `[blknum, txindex, oindex]` triples and `outputs` always four
//! `[owner, currency, amount]` triples. Unused slots are zero filled.
//! Signed form: `rlp([sigs, inputs, outputs])` with one signature per real input.

use rlp::RlpStream;
use web3::types::Address;

use crate::crypto::keccak256;
use crate::transaction::{Output, MAX_INPUTS, MAX_OUTPUTS};
use crate::utxo::UtxoPosition;

/// Encoding of an unsigned transaction
pub fn encode_unsigned(inputs: &[UtxoPosition], outputs: &[Output]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(2);
    append_inputs(&mut stream, inputs);
    append_outputs(&mut stream, outputs);
    stream.out().to_vec()
}

/// Hash signed by the input owners
pub fn signing_hash(inputs: &[UtxoPosition], outputs: &[Output]) -> [u8; 32] {
    keccak256(&encode_unsigned(inputs, outputs))
}

/// Encoding submitted to the watcher
pub fn encode_signed(signatures: &[Vec<u8>], inputs: &[UtxoPosition], outputs: &[Output]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(3);
    stream.begin_list(signatures.len());
    for signature in signatures {
        stream.append(signature);
    }
    append_inputs(&mut stream, inputs);
    append_outputs(&mut stream, outputs);
    stream.out().to_vec()
}

/// Deposit transaction: no inputs and a single output
pub fn encode_deposit(owner: Address, currency: Address, amount: u128) -> Vec<u8> {
    encode_unsigned(&[], &[Output::new(owner, currency, amount)])
}

fn append_inputs(stream: &mut RlpStream, inputs: &[UtxoPosition]) {
    stream.begin_list(MAX_INPUTS);
    for slot in 0..MAX_INPUTS {
        let position = inputs.get(slot).copied().unwrap_or_default();
        stream.begin_list(3);
        stream.append(&position.blknum());
        stream.append(&position.txindex());
        stream.append(&position.oindex());
    }
}

fn append_outputs(stream: &mut RlpStream, outputs: &[Output]) {
    stream.begin_list(MAX_OUTPUTS);
    for slot in 0..MAX_OUTPUTS {
        let output = outputs
            .get(slot)
            .copied()
            .unwrap_or_else(|| Output::new(Address::zero(), Address::zero(), 0));
        stream.begin_list(3);
        stream.append(&output.owner.as_bytes().to_vec());
        stream.append(&output.currency.as_bytes().to_vec());
        stream.append(&output.amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utxo::ETH_CURRENCY;

    fn position(blknum: u64, oindex: u64) -> UtxoPosition {
        UtxoPosition::new(blknum, 0, oindex).unwrap()
    }

    #[test]
    fn test_padding_keeps_shape_fixed() {
        let one = encode_unsigned(
            &[position(1000, 0)],
            &[Output::new(Address::repeat_byte(1), ETH_CURRENCY, 10)],
        );
        let decoded = rlp::Rlp::new(&one);
        assert_eq!(decoded.item_count().unwrap(), 2);
        assert_eq!(decoded.at(0).unwrap().item_count().unwrap(), MAX_INPUTS);
        assert_eq!(decoded.at(1).unwrap().item_count().unwrap(), MAX_OUTPUTS);

        let first_input = decoded.at(0).unwrap().at(0).unwrap();
        assert_eq!(first_input.val_at::<u64>(0).unwrap(), 1000);
        let padded_input = decoded.at(0).unwrap().at(3).unwrap();
        assert_eq!(padded_input.val_at::<u64>(0).unwrap(), 0);
    }

    #[test]
    fn test_input_order_changes_hash() {
        let outputs = [Output::new(Address::repeat_byte(1), ETH_CURRENCY, 10)];
        let a = signing_hash(&[position(1000, 0), position(2000, 0)], &outputs);
        let b = signing_hash(&[position(2000, 0), position(1000, 0)], &outputs);
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_encoding_carries_signatures() {
        let inputs = [position(1000, 0)];
        let outputs = [Output::new(Address::repeat_byte(1), ETH_CURRENCY, 10)];
        let signature = vec![7u8; 65];
        let encoded = encode_signed(&[signature.clone()], &inputs, &outputs);

        let decoded = rlp::Rlp::new(&encoded);
        assert_eq!(decoded.item_count().unwrap(), 3);
        let sigs: Vec<Vec<u8>> = decoded.list_at(0).unwrap();
        assert_eq!(sigs, vec![signature]);
        assert_eq!(decoded.at(1).unwrap().as_raw(), rlp::Rlp::new(&encode_unsigned(&inputs, &outputs)).at(0).unwrap().as_raw());
    }

    #[test]
    fn test_deposit_has_no_inputs() {
        let encoded = encode_deposit(Address::repeat_byte(3), ETH_CURRENCY, 1_000);
        let decoded = rlp::Rlp::new(&encoded);
        for slot in 0..MAX_INPUTS {
            let input = decoded.at(0).unwrap().at(slot).unwrap();
            assert_eq!(input.val_at::<u64>(0).unwrap(), 0);
        }
        let output = decoded.at(1).unwrap().at(0).unwrap();
        assert_eq!(output.val_at::<u128>(2).unwrap(), 1_000);
    }
}
