//! Command configuration
//!
//! One structure per command, filled in by the command line layer and passed by
//! value into [`crate::commands`]. Values stay in their textual form here; the
//! commands parse and validate them before doing any I/O.

use std::time::Duration;

/// Default timeout of a single watcher request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default gas limit for contract calls
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;
/// Default bond paid when starting a standard exit, in wei
pub const DEFAULT_EXIT_BOND: u128 = 31_415_926_535;
/// Default number of exits processed per call
pub const DEFAULT_PROCESS_BATCH: i64 = 100;

/// Watcher endpoint
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub url: String,
    pub request_timeout: Duration,
}

impl WatcherConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Ethereum client and the key paying for gas
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub client_url: String,
    pub private_key: String,
    pub gas_limit: u64,
}

impl ChainConfig {
    pub fn new(client_url: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_url: client_url.into(),
            private_key: private_key.into(),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

/// `get utxos` and `get balance`
#[derive(Debug, Clone)]
pub struct AccountQueryConfig {
    pub watcher: WatcherConfig,
    pub address: String,
}

/// `get status`
#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub watcher: WatcherConfig,
}

/// `get exit`
#[derive(Debug, Clone)]
pub struct ExitDataConfig {
    pub watcher: WatcherConfig,
    pub utxo_pos: u64,
}

/// `deposit`
#[derive(Debug, Clone)]
pub struct DepositConfig {
    pub chain: ChainConfig,
    pub contract: String,
    pub owner: String,
    pub amount: u128,
    pub currency: String,
}

/// `send`
#[derive(Debug, Clone)]
pub struct SendConfig {
    pub watcher: WatcherConfig,
    pub private_key: String,
    pub from_utxo: u64,
    pub to_owner: String,
    pub amount: u128,
}

/// `split`
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub watcher: WatcherConfig,
    pub private_key: String,
    pub from_utxo: u64,
    pub to_owner: String,
    pub outputs: usize,
}

/// `merge`
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub watcher: WatcherConfig,
    pub private_key: String,
    pub from_utxos: Vec<u64>,
}

/// `exit`
#[derive(Debug, Clone)]
pub struct ExitConfig {
    pub watcher: WatcherConfig,
    pub chain: ChainConfig,
    pub contract: String,
    pub utxo_pos: u64,
    pub exit_bond: u128,
}

/// `process`
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub chain: ChainConfig,
    pub contract: String,
    pub token: String,
    pub batch_size: i64,
}
