//! Child chain UTXO records
//! Defines the UTXO as reported by the watcher and the currency helpers

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use web3::types::Address;

use crate::error::ValidationError;
use crate::utxo::position::UtxoPosition;

/// Currency address used for native ETH
pub const ETH_CURRENCY: Address = Address::zero();

/// Unspent output owned by an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Child chain block number
    pub blknum: u64,
    /// Transaction index in the block
    pub txindex: u64,
    /// Output index in the transaction
    pub oindex: u64,
    /// Packed position as reported by the watcher
    pub utxo_pos: u64,
    /// Current owner
    pub owner: Address,
    /// Token address, zero for ETH
    pub currency: Address,
    /// Amount in the token's smallest unit
    pub amount: u128,
}

impl Utxo {
    /// Position of this output. Fails if a component is out of range or the
    /// components disagree with `utxo_pos`.
    pub fn position(&self) -> Result<UtxoPosition, ValidationError> {
        let position = UtxoPosition::new(self.blknum, self.txindex, self.oindex)?;
        if position.encode() != self.utxo_pos {
            return Err(ValidationError::InvalidPosition(format!(
                "utxo_pos {} does not match block {} tx {} output {}",
                self.utxo_pos, self.blknum, self.txindex, self.oindex
            )));
        }
        Ok(position)
    }

    /// True if the output holds ETH
    pub fn is_eth(&self) -> bool {
        self.currency == ETH_CURRENCY
    }
}

/// Per-currency balance of an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: Address,
    pub amount: u128,
}

/// Parse a hex address with or without the `0x` prefix
pub fn parse_address(value: &str) -> Result<Address, ValidationError> {
    let trimmed = value.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_part.len() != 40 {
        return Err(ValidationError::InvalidAddress(value.to_string()));
    }
    Address::from_str(hex_part).map_err(|_| ValidationError::InvalidAddress(value.to_string()))
}

/// Parse a currency, accepting `ETH` for the zero address
pub fn parse_currency(value: &str) -> Result<Address, ValidationError> {
    if value.trim().eq_ignore_ascii_case("eth") {
        return Ok(ETH_CURRENCY);
    }
    parse_address(value)
}

/// Human readable currency label
pub fn currency_label(currency: &Address) -> String {
    if *currency == ETH_CURRENCY {
        "ETH".to_string()
    } else {
        format!("{:?}", currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_watcher_utxo() {
        let raw = r#"{
            "blknum": 1000,
            "txindex": 0,
            "oindex": 1,
            "utxo_pos": 1000000000001,
            "owner": "0x944a81beecac91802787fbcfb9767fcbf81db1f5",
            "currency": "0x0000000000000000000000000000000000000000",
            "amount": 100
        }"#;

        let utxo: Utxo = serde_json::from_str(raw).unwrap();
        assert_eq!(utxo.position().unwrap().encode(), utxo.utxo_pos);
        assert!(utxo.is_eth());
        assert_eq!(utxo.amount, 100);
    }

    #[test]
    fn test_position_rejects_inconsistent_records() {
        let mut utxo = Utxo {
            blknum: 1000,
            txindex: 0,
            oindex: 1,
            utxo_pos: 1_000_000_000_001,
            owner: Address::zero(),
            currency: ETH_CURRENCY,
            amount: 1,
        };
        assert!(utxo.position().is_ok());

        utxo.utxo_pos = 2_000_000_000_001;
        assert!(matches!(utxo.position(), Err(ValidationError::InvalidPosition(_))));

        utxo.blknum = u64::MAX;
        assert!(matches!(utxo.position(), Err(ValidationError::InvalidPosition(_))));

        // txindex past its slot would alias another block
        utxo.blknum = 1000;
        utxo.txindex = 100_000;
        utxo.utxo_pos = 1_000_000_000_001 + 100_000 * 10_000;
        assert!(matches!(utxo.position(), Err(ValidationError::InvalidPosition(_))));
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("ETH").unwrap(), ETH_CURRENCY);
        assert_eq!(parse_currency("eth").unwrap(), ETH_CURRENCY);
        let token = parse_currency("0x457e2ec4ad356d3cb449e3bd4ba640d720c30377").unwrap();
        assert_ne!(token, ETH_CURRENCY);
        assert_eq!(currency_label(&ETH_CURRENCY), "ETH");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("not an address at all, not even close!!!").is_err());
        assert!(parse_address("944A81BeECac91802787fBCFB9767FCBf81db1f5").is_ok());
    }
}
