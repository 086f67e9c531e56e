//! Watcher Module
//! Client side of the watcher HTTP API: queries, exit data and submission

pub mod client;
pub mod resolver;
pub mod types;

// Re-export main types
pub use client::WatcherClient;
pub use resolver::UtxoResolver;
pub use types::{ExitData, SubmitReceipt, WatcherStatus};
