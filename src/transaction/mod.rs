//! Child chain transactions
//!
//! A [`Transaction`] can only be obtained through [`Transaction::new`], which checks
//! the protocol invariants:
//! - between 1 and 4 inputs and between 1 and 4 outputs
//! - inputs are pairwise distinct and outputs carry non-zero amounts
//! - for every currency the input and output sums are equal, and no output uses a
//!   currency absent from the inputs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use web3::types::Address;

use crate::error::ValidationError;
use crate::utxo::{currency_label, Utxo, UtxoPosition};

pub mod builder;
pub mod encoding;

pub use builder::{build, split_amounts, TransactionIntent};
pub use encoding::{encode_deposit, encode_signed, encode_unsigned, signing_hash};

/// Maximum inputs per transaction
pub const MAX_INPUTS: usize = 4;
/// Maximum outputs per transaction
pub const MAX_OUTPUTS: usize = 4;

/// New output created by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub owner: Address,
    pub currency: Address,
    pub amount: u128,
}

impl Output {
    pub fn new(owner: Address, currency: Address, amount: u128) -> Self {
        Self {
            owner,
            currency,
            amount,
        }
    }
}

/// Balanced, unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    inputs: Vec<Utxo>,
    positions: Vec<UtxoPosition>,
    outputs: Vec<Output>,
}

impl Transaction {
    /// Create a transaction, rejecting anything that breaks the protocol invariants
    pub fn new(inputs: Vec<Utxo>, outputs: Vec<Output>) -> Result<Self, ValidationError> {
        if inputs.is_empty() || inputs.len() > MAX_INPUTS {
            return Err(ValidationError::InvalidInputCount {
                count: inputs.len(),
                min: 1,
                max: MAX_INPUTS,
            });
        }
        if outputs.is_empty() || outputs.len() > MAX_OUTPUTS {
            return Err(ValidationError::InvalidOutputCount {
                count: outputs.len(),
                min: 1,
                max: MAX_OUTPUTS,
            });
        }

        let positions = inputs
            .iter()
            .map(Utxo::position)
            .collect::<Result<Vec<_>, _>>()?;
        let mut seen = HashSet::new();
        for position in &positions {
            if !seen.insert(*position) {
                return Err(ValidationError::DuplicateInput(position.encode()));
            }
        }

        if outputs.iter().any(|output| output.amount == 0) {
            return Err(ValidationError::ZeroAmount);
        }

        let input_sums = sum_by_currency(inputs.iter().map(|u| (u.currency, u.amount)))?;
        let output_sums = sum_by_currency(outputs.iter().map(|o| (o.currency, o.amount)))?;

        for currency in output_sums.keys() {
            if !input_sums.contains_key(currency) {
                return Err(ValidationError::UnbalancedTransaction(format!(
                    "output currency {} is not funded by any input",
                    currency_label(currency)
                )));
            }
        }
        for (currency, input_total) in &input_sums {
            let output_total = output_sums.get(currency).copied().unwrap_or(0);
            if output_total != *input_total {
                return Err(ValidationError::UnbalancedTransaction(format!(
                    "{} inputs sum to {} but outputs sum to {}",
                    currency_label(currency),
                    input_total,
                    output_total
                )));
            }
        }

        Ok(Self {
            inputs,
            positions,
            outputs,
        })
    }

    /// Inputs in signing order
    pub fn inputs(&self) -> &[Utxo] {
        &self.inputs
    }

    /// Outputs in signing order
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Positions of the inputs in signing order
    pub fn input_positions(&self) -> &[UtxoPosition] {
        &self.positions
    }
}

fn sum_by_currency(
    entries: impl Iterator<Item = (Address, u128)>,
) -> Result<BTreeMap<Address, u128>, ValidationError> {
    let mut sums = BTreeMap::new();
    for (currency, amount) in entries {
        let total = sums.entry(currency).or_insert(0u128);
        *total = total.checked_add(amount).ok_or_else(|| {
            ValidationError::UnbalancedTransaction(format!(
                "{} amount overflows",
                currency_label(&currency)
            ))
        })?;
    }
    Ok(sums)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub fn address(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    pub fn utxo(blknum: u64, oindex: u64, owner: Address, currency: Address, amount: u128) -> Utxo {
        let position = UtxoPosition::new(blknum, 0, oindex).unwrap();
        Utxo {
            blknum,
            txindex: 0,
            oindex,
            utxo_pos: position.encode(),
            owner,
            currency,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use crate::utxo::ETH_CURRENCY;

    #[test]
    fn test_balanced_transaction_is_accepted() {
        let owner = address(1);
        let tx = Transaction::new(
            vec![utxo(1000, 0, owner, ETH_CURRENCY, 10)],
            vec![
                Output::new(address(2), ETH_CURRENCY, 4),
                Output::new(owner, ETH_CURRENCY, 6),
            ],
        )
        .unwrap();
        assert_eq!(tx.inputs().len(), 1);
        assert_eq!(tx.outputs().len(), 2);
    }

    #[test]
    fn test_unbalanced_transaction_is_rejected() {
        let owner = address(1);
        let result = Transaction::new(
            vec![utxo(1000, 0, owner, ETH_CURRENCY, 10)],
            vec![Output::new(owner, ETH_CURRENCY, 11)],
        );
        assert!(matches!(result, Err(ValidationError::UnbalancedTransaction(_))));
    }

    #[test]
    fn test_unfunded_currency_is_rejected() {
        let owner = address(1);
        let token = address(9);
        let result = Transaction::new(
            vec![
                utxo(1000, 0, owner, ETH_CURRENCY, 10),
                utxo(1000, 1, owner, token, 5),
            ],
            vec![
                Output::new(owner, ETH_CURRENCY, 10),
                Output::new(owner, address(7), 5),
            ],
        );
        assert!(matches!(result, Err(ValidationError::UnbalancedTransaction(_))));
    }

    #[test]
    fn test_count_limits() {
        let owner = address(1);
        let no_inputs = Transaction::new(vec![], vec![Output::new(owner, ETH_CURRENCY, 1)]);
        assert!(matches!(
            no_inputs,
            Err(ValidationError::InvalidInputCount { count: 0, .. })
        ));

        let five_outputs = Transaction::new(
            vec![utxo(1000, 0, owner, ETH_CURRENCY, 5)],
            (0..5).map(|_| Output::new(owner, ETH_CURRENCY, 1)).collect(),
        );
        assert!(matches!(
            five_outputs,
            Err(ValidationError::InvalidOutputCount { count: 5, .. })
        ));
    }

    #[test]
    fn test_input_with_inconsistent_position_is_rejected() {
        let owner = address(1);
        let mut input = utxo(1000, 0, owner, ETH_CURRENCY, 10);
        input.utxo_pos += 1;
        let result = Transaction::new(vec![input], vec![Output::new(owner, ETH_CURRENCY, 10)]);
        assert!(matches!(result, Err(ValidationError::InvalidPosition(_))));
    }

    #[test]
    fn test_duplicate_input_is_rejected() {
        let owner = address(1);
        let input = utxo(1000, 0, owner, ETH_CURRENCY, 5);
        let result = Transaction::new(
            vec![input.clone(), input],
            vec![Output::new(owner, ETH_CURRENCY, 10)],
        );
        assert!(matches!(result, Err(ValidationError::DuplicateInput(_))));
    }
}
