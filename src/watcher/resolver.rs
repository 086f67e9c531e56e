//! UTXO resolution
//!
//! Resolves positions to full UTXO records. Nothing is cached: every call asks the
//! watcher again so ownership is never taken from stale data.

use futures::future::try_join_all;
use web3::types::Address;

use crate::error::{Error, Result};
use crate::utxo::{Balance, Utxo, UtxoPosition};
use crate::watcher::client::WatcherClient;

pub struct UtxoResolver {
    watcher: WatcherClient,
}

impl UtxoResolver {
    pub fn new(watcher: WatcherClient) -> Self {
        Self { watcher }
    }

    /// Every UTXO owned by `owner`
    pub async fn get_utxos(&self, owner: Address) -> Result<Vec<Utxo>> {
        self.watcher.get_utxos(owner).await
    }

    /// Per-currency balance of `owner`
    pub async fn get_balance(&self, owner: Address) -> Result<Vec<Balance>> {
        self.watcher.get_balance(owner).await
    }

    /// The UTXO of `owner` at `position`
    pub async fn resolve(&self, owner: Address, position: u64) -> Result<Utxo> {
        let utxos = self.watcher.get_utxos(owner).await?;
        utxos
            .into_iter()
            .find(|utxo| utxo.utxo_pos == position)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "UTXO {} ({:?}) not owned by {:?}",
                    position,
                    UtxoPosition::decode(position),
                    owner
                ))
            })
    }

    /// Resolve several positions concurrently, keeping the order of `positions`
    pub async fn resolve_many(&self, owner: Address, positions: &[u64]) -> Result<Vec<Utxo>> {
        try_join_all(positions.iter().map(|position| self.resolve(owner, *position))).await
    }
}
