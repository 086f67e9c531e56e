//! UTXO Module
//! Child chain outputs and their packed positions

pub mod position;
pub mod utxo;

// Re-export main types
pub use position::UtxoPosition;
pub use utxo::{currency_label, parse_address, parse_currency, Balance, Utxo, ETH_CURRENCY};
