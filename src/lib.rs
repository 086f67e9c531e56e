//! Client for a Plasma MoreVP child chain
//!
//! Builds and signs transfer, split and merge transactions, submits them to a
//! watcher, and drives deposits and standard exits on the root chain contract.

pub mod commands;
pub mod config;
pub mod crypto;
pub mod error;
pub mod exit;
pub mod rootchain;
pub mod transaction;
pub mod utxo;
pub mod watcher;

// Re-export main types for easy access
pub use error::{Error, Result, ValidationError};
pub use exit::{ExitCoordinator, ExitProcessingJob, ExitRequest, ExitState};
pub use rootchain::{Deposit, RootChain, RootChainContract};
pub use transaction::{build, Output, Transaction, TransactionIntent};
pub use utxo::{Utxo, UtxoPosition};
pub use watcher::{UtxoResolver, WatcherClient};
