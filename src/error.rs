//! Error types for the Plasma client
//!
//! `ValidationError` covers everything that can be detected locally, before any
//! watcher or root chain call is made. `Error` is the top level type returned by
//! every core operation.

use web3::types::Address;

use crate::exit::ExitState;

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid UTXO position: {0}")]
    InvalidPosition(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u128, available: u128 },

    #[error("Invalid output count {count}: must be between {min} and {max}")]
    InvalidOutputCount { count: usize, min: usize, max: usize },

    #[error("Invalid input count {count}: must be between {min} and {max}")]
    InvalidInputCount { count: usize, min: usize, max: usize },

    #[error("Currency mismatch: inputs span {first:?} and {second:?}")]
    CurrencyMismatch { first: Address, second: Address },

    #[error("UTXO {position} is owned by {actual:?}, expected {expected:?}")]
    OwnerMismatch {
        position: u64,
        expected: Address,
        actual: Address,
    },

    #[error("UTXO {0} appears more than once in the inputs")]
    DuplicateInput(u64),

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Invalid batch size {0}: must be greater than zero")]
    InvalidBatchSize(i64),

    #[error("Unbalanced transaction: {0}")]
    UnbalancedTransaction(String),
}

/// Errors surfaced by core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InputValidation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot reach {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Transaction rejected by watcher ({code}): {description}")]
    RejectedTransaction { code: String, description: String },

    #[error("Exit data unavailable for UTXO {position}: {reason}")]
    ExitDataUnavailable { position: u64, reason: String },

    #[error("Watcher error ({code}): {description}")]
    Watcher { code: String, description: String },

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Illegal exit transition {from:?} -> {to:?}")]
    IllegalExitTransition { from: ExitState, to: ExitState },

    #[error("Malformed watcher response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// True when the failure was detected locally, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InputValidation(_))
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;
