//! HTTP client for the watcher API

use serde::de::DeserializeOwned;
use serde::Serialize;
use web3::types::Address;

use crate::config::WatcherConfig;
use crate::crypto::SignedTransaction;
use crate::error::{Error, Result};
use crate::utxo::{Balance, Utxo, UtxoPosition};
use crate::watcher::types::{
    AddressRequest, Envelope, EnvelopeStatus, ExitData, ExitDataRequest, SubmitData,
    SubmitReceipt, SubmitRequest, WatcherErrorData, WatcherStatus,
};

/// Outcome of a watcher call that reached the service
enum Reply<T> {
    Ok(T),
    Failed(WatcherErrorData),
}

/// Watcher API client
#[derive(Debug, Clone)]
pub struct WatcherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WatcherClient {
    pub fn new(config: &WatcherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Unreachable {
                endpoint: config.url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// All UTXOs owned by `owner`. Records whose position fields are out of range
    /// or disagree with `utxo_pos` are rejected.
    pub async fn get_utxos(&self, owner: Address) -> Result<Vec<Utxo>> {
        let reply = self
            .call("account.get_utxos", &AddressRequest { address: owner })
            .await?;
        let utxos: Vec<Utxo> = expect_ok(reply)?;
        for utxo in &utxos {
            utxo.position().map_err(|e| {
                Error::MalformedResponse(format!("account.get_utxos: {}", e))
            })?;
        }
        Ok(utxos)
    }

    /// Per-currency balance of `owner`
    pub async fn get_balance(&self, owner: Address) -> Result<Vec<Balance>> {
        let reply = self
            .call("account.get_balance", &AddressRequest { address: owner })
            .await?;
        expect_ok(reply)
    }

    /// Sync status of the watcher
    pub async fn get_status(&self) -> Result<WatcherStatus> {
        let reply = self.call("status.get", &serde_json::json!({})).await?;
        expect_ok(reply)
    }

    /// Exit proof for the output at `utxo_pos`
    pub async fn get_exit_data(&self, utxo_pos: u64) -> Result<ExitData> {
        let reply = self
            .call("utxo.get_exit_data", &ExitDataRequest { utxo_pos })
            .await?;

        match reply {
            Reply::Ok(data) => Ok(data),
            Reply::Failed(err) => Err(Error::ExitDataUnavailable {
                position: utxo_pos,
                reason: format!("{}: {}", err.code, err.description()),
            }),
        }
    }

    /// Submit a signed transaction
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<SubmitReceipt> {
        let request = SubmitRequest {
            transaction: signed.encode_hex(),
        };
        let reply: Reply<SubmitData> = self.call("transaction.submit", &request).await?;

        match reply {
            Reply::Ok(data) => {
                let created = (0..signed.transaction.outputs().len() as u64)
                    .map(|oindex| UtxoPosition::new(data.blknum, data.txindex, oindex))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                log::info!(
                    "transaction {:?} included in block {} at index {}",
                    data.txhash,
                    data.blknum,
                    data.txindex
                );
                Ok(SubmitReceipt {
                    blknum: data.blknum,
                    txindex: data.txindex,
                    txhash: data.txhash,
                    created,
                })
            }
            Reply::Failed(err) => Err(Error::RejectedTransaction {
                description: err.description(),
                code: err.code,
            }),
        }
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<Reply<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);
        log::debug!("watcher call {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let raw = response.bytes().await.map_err(|e| Error::Unreachable {
            endpoint: url.clone(),
            reason: e.to_string(),
        })?;
        let malformed =
            |e: serde_json::Error| Error::MalformedResponse(format!("{} returned {}: {}", method, status, e));

        // `data` is decoded straight into its target type so u128 amounts survive
        let head: EnvelopeStatus = serde_json::from_slice(&raw).map_err(malformed)?;
        if head.success {
            let envelope: Envelope<T> = serde_json::from_slice(&raw).map_err(malformed)?;
            Ok(Reply::Ok(envelope.data))
        } else {
            let err = serde_json::from_slice::<Envelope<WatcherErrorData>>(&raw)
                .map(|envelope| envelope.data)
                .unwrap_or_default();
            log::warn!("watcher {} failed: {} {}", method, err.code, err.description());
            Ok(Reply::Failed(err))
        }
    }
}

fn expect_ok<T>(reply: Reply<T>) -> Result<T> {
    match reply {
        Reply::Ok(data) => Ok(data),
        Reply::Failed(err) => Err(Error::Watcher {
            description: err.description(),
            code: err.code,
        }),
    }
}
