//! Watcher API Request and Response Types
//!
//! Every watcher reply is wrapped in `{"success": bool, "data": ...}`. On failure
//! `data` holds an error object with a `code` and a `description`.

use serde::{Deserialize, Deserializer, Serialize};
use web3::types::{Address, H256};

use crate::utxo::UtxoPosition;

/// Leading flag of every reply, read before `data` is decoded
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeStatus {
    pub success: bool,
}

/// Reply envelope shared by every endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Error object returned when `success` is false
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatcherErrorData {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl WatcherErrorData {
    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.code.clone())
    }
}

/// Body of the account queries
#[derive(Debug, Clone, Serialize)]
pub struct AddressRequest {
    pub address: Address,
}

/// Body of `utxo.get_exit_data`
#[derive(Debug, Clone, Serialize)]
pub struct ExitDataRequest {
    pub utxo_pos: u64,
}

/// Body of `transaction.submit`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub transaction: String,
}

/// Watcher sync status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherStatus {
    pub last_validated_child_block_number: u64,
    pub last_mined_child_block_number: u64,
    pub last_mined_child_block_timestamp: u64,
    pub eth_syncing: bool,
    pub byzantine_events: Vec<serde_json::Value>,
}

/// Proof data needed to start a standard exit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExitData {
    pub utxo_pos: u64,
    /// Encoded transaction that created the output
    #[serde(deserialize_with = "hex_bytes")]
    pub txbytes: Vec<u8>,
    /// Merkle inclusion proof of that transaction
    #[serde(deserialize_with = "hex_bytes")]
    pub proof: Vec<u8>,
}

/// Raw submit reply
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitData {
    pub blknum: u64,
    pub txindex: u64,
    pub txhash: H256,
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub blknum: u64,
    pub txindex: u64,
    pub txhash: H256,
    /// Outputs created by the transaction, in output order
    pub created: Vec<UtxoPosition>,
}

/// Decode a hex string with or without `0x`
fn hex_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let hex_part = raw.strip_prefix("0x").unwrap_or(&raw);
    hex::decode(hex_part).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_data_accepts_both_hex_forms() {
        let with_prefix: ExitData = serde_json::from_value(serde_json::json!({
            "utxo_pos": 1000000000000u64,
            "txbytes": "0xdead",
            "proof": "beef"
        }))
        .unwrap();
        assert_eq!(with_prefix.txbytes, vec![0xde, 0xad]);
        assert_eq!(with_prefix.proof, vec![0xbe, 0xef]);
    }

    #[test]
    fn test_envelope_keeps_amounts_above_u64() {
        let raw = br#"{
            "success": true,
            "data": [{
                "currency": "0x0000000000000000000000000000000000000000",
                "amount": 100000000000000000000
            }]
        }"#;

        let status: EnvelopeStatus = serde_json::from_slice(raw).unwrap();
        assert!(status.success);
        let envelope: Envelope<Vec<crate::utxo::Balance>> = serde_json::from_slice(raw).unwrap();
        assert_eq!(envelope.data[0].amount, 100_000_000_000_000_000_000);
    }

    #[test]
    fn test_status_tolerates_missing_fields() {
        let status: WatcherStatus = serde_json::from_value(serde_json::json!({
            "last_validated_child_block_number": 12000,
            "some_future_field": true
        }))
        .unwrap();
        assert_eq!(status.last_validated_child_block_number, 12000);
        assert!(status.byzantine_events.is_empty());
    }
}
