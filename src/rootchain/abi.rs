//! Calldata for the root chain contract entry points

use web3::ethabi::{encode, short_signature, ParamType, Token};
use web3::types::{Address, U256};

/// `deposit(bytes)`, payable, for ETH deposits
pub fn deposit(deposit_tx: Vec<u8>) -> Vec<u8> {
    call("deposit", &[ParamType::Bytes], &[Token::Bytes(deposit_tx)])
}

/// `depositFrom(bytes)` for ERC20 deposits, pulls the approved allowance
pub fn deposit_from(deposit_tx: Vec<u8>) -> Vec<u8> {
    call("depositFrom", &[ParamType::Bytes], &[Token::Bytes(deposit_tx)])
}

/// `startStandardExit(uint192,bytes,bytes)`
pub fn start_standard_exit(utxo_pos: u64, output_tx: Vec<u8>, proof: Vec<u8>) -> Vec<u8> {
    call(
        "startStandardExit",
        &[ParamType::Uint(192), ParamType::Bytes, ParamType::Bytes],
        &[
            Token::Uint(U256::from(utxo_pos)),
            Token::Bytes(output_tx),
            Token::Bytes(proof),
        ],
    )
}

/// `processExits(address,uint192,uint256)`
pub fn process_exits(token: Address, top_utxo_pos: u64, exits_to_process: u64) -> Vec<u8> {
    call(
        "processExits",
        &[ParamType::Address, ParamType::Uint(192), ParamType::Uint(256)],
        &[
            Token::Address(token),
            Token::Uint(U256::from(top_utxo_pos)),
            Token::Uint(U256::from(exits_to_process)),
        ],
    )
}

fn call(name: &str, params: &[ParamType], tokens: &[Token]) -> Vec<u8> {
    let mut data = short_signature(name, params).to_vec();
    data.extend_from_slice(&encode(tokens));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keccak256;

    #[test]
    fn test_selectors_match_signatures() {
        let data = process_exits(Address::zero(), 0, 100);
        assert_eq!(&data[..4], &keccak256(b"processExits(address,uint192,uint256)")[..4]);
        // selector + three static words
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(data[4 + 3 * 32 - 1], 100);

        let exit = start_standard_exit(1_000_000_000, vec![1, 2, 3], vec![4; 40]);
        assert_eq!(&exit[..4], &keccak256(b"startStandardExit(uint192,bytes,bytes)")[..4]);

        let dep = deposit(vec![0xc0]);
        assert_eq!(&dep[..4], &keccak256(b"deposit(bytes)")[..4]);
        let dep_from = deposit_from(vec![0xc0]);
        assert_eq!(&dep_from[..4], &keccak256(b"depositFrom(bytes)")[..4]);
    }
}
