//! UTXO position encoding
//!
//! A position packs `(blknum, txindex, oindex)` into one integer:
//! `blknum * 1_000_000_000 + txindex * 10_000 + oindex`.
//! The watcher and the root chain contract use the same packing.

use std::fmt;

use crate::error::ValidationError;

/// Multiplier of the block component
pub const BLOCK_OFFSET: u64 = 1_000_000_000;
/// Multiplier of the transaction component
pub const TX_OFFSET: u64 = 10_000;
/// Exclusive upper bound of `txindex`
pub const MAX_TXINDEX: u64 = BLOCK_OFFSET / TX_OFFSET;
/// Exclusive upper bound of `oindex`
pub const MAX_OINDEX: u64 = TX_OFFSET;

/// Decoded position of an output on the child chain.
///
/// Only [`UtxoPosition::new`] and [`UtxoPosition::decode`] create one, so the packed
/// form always fits in a `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtxoPosition {
    blknum: u64,
    txindex: u64,
    oindex: u64,
}

impl UtxoPosition {
    /// Build a position, checking every component fits its slot
    pub fn new(blknum: u64, txindex: u64, oindex: u64) -> Result<Self, ValidationError> {
        if txindex >= MAX_TXINDEX {
            return Err(ValidationError::InvalidPosition(format!(
                "txindex {} exceeds {}",
                txindex,
                MAX_TXINDEX - 1
            )));
        }
        if oindex >= MAX_OINDEX {
            return Err(ValidationError::InvalidPosition(format!(
                "oindex {} exceeds {}",
                oindex,
                MAX_OINDEX - 1
            )));
        }
        blknum
            .checked_mul(BLOCK_OFFSET)
            .and_then(|b| b.checked_add(txindex * TX_OFFSET + oindex))
            .ok_or_else(|| {
                ValidationError::InvalidPosition(format!("blknum {} is too large", blknum))
            })?;

        Ok(Self {
            blknum,
            txindex,
            oindex,
        })
    }

    pub fn blknum(&self) -> u64 {
        self.blknum
    }

    pub fn txindex(&self) -> u64 {
        self.txindex
    }

    pub fn oindex(&self) -> u64 {
        self.oindex
    }

    /// Packed integer form
    pub fn encode(&self) -> u64 {
        self.blknum * BLOCK_OFFSET + self.txindex * TX_OFFSET + self.oindex
    }

    /// Unpack an integer position
    pub fn decode(encoded: u64) -> Self {
        Self {
            blknum: encoded / BLOCK_OFFSET,
            txindex: (encoded % BLOCK_OFFSET) / TX_OFFSET,
            oindex: encoded % TX_OFFSET,
        }
    }
}

impl From<UtxoPosition> for u64 {
    fn from(position: UtxoPosition) -> Self {
        position.encode()
    }
}

impl fmt::Display for UtxoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_recovers_components() {
        let cases = [
            (0, 0, 0),
            (1, 0, 0),
            (1000, 0, 3),
            (1000, 42, 1),
            (17_000, MAX_TXINDEX - 1, MAX_OINDEX - 1),
            (u64::MAX / BLOCK_OFFSET - 1, 7, 2),
        ];

        for (blknum, txindex, oindex) in cases {
            let position = UtxoPosition::new(blknum, txindex, oindex).unwrap();
            let decoded = UtxoPosition::decode(position.encode());
            assert_eq!(decoded, position);
        }
    }

    #[test]
    fn test_known_encoding() {
        let position = UtxoPosition::new(1000, 2, 1).unwrap();
        assert_eq!(position.encode(), 1_000_000_020_001);
        assert_eq!(UtxoPosition::decode(1_000_000_000_000), UtxoPosition::new(1000, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        assert!(matches!(
            UtxoPosition::new(1, MAX_TXINDEX, 0),
            Err(ValidationError::InvalidPosition(_))
        ));
        assert!(matches!(
            UtxoPosition::new(1, 0, MAX_OINDEX),
            Err(ValidationError::InvalidPosition(_))
        ));
        assert!(matches!(
            UtxoPosition::new(u64::MAX, 0, 0),
            Err(ValidationError::InvalidPosition(_))
        ));
    }
}
