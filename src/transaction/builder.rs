//! Transaction building
//!
//! Turns a [`TransactionIntent`] into a balanced [`Transaction`]. Every rule is
//! checked here, before anything is signed or sent.

use std::collections::HashSet;
use web3::types::Address;

use crate::error::ValidationError;
use crate::transaction::{Output, Transaction, MAX_INPUTS, MAX_OUTPUTS};
use crate::utxo::Utxo;

/// Smallest output count of a split
pub const MIN_SPLIT_OUTPUTS: usize = 2;
/// Smallest input count of a merge
pub const MIN_MERGE_INPUTS: usize = 2;

/// What the caller wants to do with already resolved UTXOs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionIntent {
    /// Pay `amount` of one UTXO to `to`, returning change to `from`
    Transfer {
        input: Utxo,
        from: Address,
        to: Address,
        amount: u128,
    },
    /// Spread one UTXO over `outputs` outputs owned by `to`
    Split {
        input: Utxo,
        to: Address,
        outputs: usize,
    },
    /// Combine several same-currency UTXOs of `owner` into one
    Merge { inputs: Vec<Utxo>, owner: Address },
}

/// Build a balanced transaction from an intent
pub fn build(intent: TransactionIntent) -> Result<Transaction, ValidationError> {
    match intent {
        TransactionIntent::Transfer {
            input,
            from,
            to,
            amount,
        } => build_transfer(input, from, to, amount),
        TransactionIntent::Split { input, to, outputs } => build_split(input, to, outputs),
        TransactionIntent::Merge { inputs, owner } => build_merge(inputs, owner),
    }
}

fn build_transfer(
    input: Utxo,
    from: Address,
    to: Address,
    amount: u128,
) -> Result<Transaction, ValidationError> {
    check_owner(&input, from)?;
    if amount == 0 {
        return Err(ValidationError::ZeroAmount);
    }
    if amount > input.amount {
        return Err(ValidationError::InsufficientFunds {
            requested: amount,
            available: input.amount,
        });
    }

    let mut outputs = vec![Output::new(to, input.currency, amount)];
    let change = input.amount - amount;
    if change > 0 {
        outputs.push(Output::new(from, input.currency, change));
    }

    Transaction::new(vec![input], outputs)
}

fn build_split(input: Utxo, to: Address, count: usize) -> Result<Transaction, ValidationError> {
    let amounts = split_amounts(input.amount, count)?;
    let outputs = amounts
        .into_iter()
        .map(|amount| Output::new(to, input.currency, amount))
        .collect();

    Transaction::new(vec![input], outputs)
}

/// Even partition of `total` into `count` parts, remainder added to the first part
pub fn split_amounts(total: u128, count: usize) -> Result<Vec<u128>, ValidationError> {
    if !(MIN_SPLIT_OUTPUTS..=MAX_OUTPUTS).contains(&count) {
        return Err(ValidationError::InvalidOutputCount {
            count,
            min: MIN_SPLIT_OUTPUTS,
            max: MAX_OUTPUTS,
        });
    }
    let parts = count as u128;
    if total < parts {
        return Err(ValidationError::ZeroAmount);
    }

    let share = total / parts;
    let mut amounts = vec![share; count];
    amounts[0] += total % parts;
    Ok(amounts)
}

fn build_merge(inputs: Vec<Utxo>, owner: Address) -> Result<Transaction, ValidationError> {
    if !(MIN_MERGE_INPUTS..=MAX_INPUTS).contains(&inputs.len()) {
        return Err(ValidationError::InvalidInputCount {
            count: inputs.len(),
            min: MIN_MERGE_INPUTS,
            max: MAX_INPUTS,
        });
    }

    let currency = inputs[0].currency;
    let mut seen = HashSet::new();
    for input in &inputs {
        if input.currency != currency {
            return Err(ValidationError::CurrencyMismatch {
                first: currency,
                second: input.currency,
            });
        }
        check_owner(input, owner)?;
        let position = input.position()?;
        if !seen.insert(position) {
            return Err(ValidationError::DuplicateInput(position.encode()));
        }
    }

    let total = inputs
        .iter()
        .try_fold(0u128, |acc, input| acc.checked_add(input.amount))
        .ok_or_else(|| ValidationError::UnbalancedTransaction("merged amount overflows".to_string()))?;

    Transaction::new(inputs, vec![Output::new(owner, currency, total)])
}

fn check_owner(input: &Utxo, owner: Address) -> Result<(), ValidationError> {
    if input.owner != owner {
        return Err(ValidationError::OwnerMismatch {
            position: input.utxo_pos,
            expected: owner,
            actual: input.owner,
        });
    }
    Ok(())
}
