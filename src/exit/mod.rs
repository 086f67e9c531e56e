//! Exit Module
//!
//! Drives the standard exit protocol for a single output:
//! `Unclaimed -> ExitRequested -> Exiting -> Processed | Superseded`.
//! The client only observes the first three states. Processing and challenges
//! happen on the root chain.

use web3::types::{Address, H256};

use crate::error::{Error, Result, ValidationError};
use crate::rootchain::RootChain;
use crate::watcher::{ExitData, WatcherClient};

/// Lifecycle of an output leaving the child chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Unclaimed,
    /// Exit data fetched, contract call pending
    ExitRequested,
    /// In the challenge period
    Exiting,
    Processed,
    /// Challenged by a third party
    Superseded,
}

impl ExitState {
    pub fn can_transition_to(&self, next: ExitState) -> bool {
        use ExitState::*;
        matches!(
            (self, next),
            (Unclaimed, ExitRequested)
                | (ExitRequested, Exiting)
                | (Exiting, Processed)
                | (Exiting, Superseded)
        )
    }

    /// Move to `next`, or `None` if the protocol does not allow it
    pub fn advance(self, next: ExitState) -> Option<ExitState> {
        self.can_transition_to(next).then_some(next)
    }
}

/// Everything the contract needs to start a standard exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRequest {
    pub utxo_pos: u64,
    /// Transaction that created the output
    pub output_tx: Vec<u8>,
    /// Inclusion proof of `output_tx`
    pub proof: Vec<u8>,
    pub contract: Address,
    /// Bond paid with the call, in wei
    pub bond: u128,
}

impl ExitRequest {
    pub fn from_exit_data(data: ExitData, contract: Address, bond: u128) -> Self {
        Self {
            utxo_pos: data.utxo_pos,
            output_tx: data.txbytes,
            proof: data.proof,
            contract,
            bond,
        }
    }
}

/// One bounded round of exit processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitProcessingJob {
    pub contract: Address,
    pub token: Address,
    pub batch_size: u64,
}

impl ExitProcessingJob {
    pub fn new(contract: Address, token: Address, batch_size: i64) -> std::result::Result<Self, ValidationError> {
        if batch_size <= 0 {
            return Err(ValidationError::InvalidBatchSize(batch_size));
        }
        Ok(Self {
            contract,
            token,
            batch_size: batch_size as u64,
        })
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize(0));
        }
        Ok(())
    }
}

/// Exit that reached the challenge period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedExit {
    pub utxo_pos: u64,
    pub tx_hash: H256,
    pub state: ExitState,
}

pub struct ExitCoordinator<C> {
    watcher: WatcherClient,
    chain: C,
}

impl<C: RootChain> ExitCoordinator<C> {
    pub fn new(watcher: WatcherClient, chain: C) -> Self {
        Self { watcher, chain }
    }

    /// Read-only lookup of the exit proof for `utxo_pos`
    pub async fn get_exit_data(&self, utxo_pos: u64) -> Result<ExitData> {
        self.watcher.get_exit_data(utxo_pos).await
    }

    /// Fetch the proof and start a standard exit. Single attempt, no retry.
    pub async fn start_standard_exit(
        &self,
        utxo_pos: u64,
        contract: Address,
        bond: u128,
    ) -> Result<StartedExit> {
        let mut state = ExitState::Unclaimed;

        let data = self.get_exit_data(utxo_pos).await?;
        if data.utxo_pos != utxo_pos {
            return Err(Error::ExitDataUnavailable {
                position: utxo_pos,
                reason: format!("watcher returned data for {}", data.utxo_pos),
            });
        }
        state = advance(state, ExitState::ExitRequested)?;

        let request = ExitRequest::from_exit_data(data, contract, bond);
        log::info!("starting standard exit of UTXO {}", utxo_pos);
        let tx_hash = self.chain.start_standard_exit(&request).await?;
        state = advance(state, ExitState::Exiting)?;

        Ok(StartedExit {
            utxo_pos,
            tx_hash,
            state,
        })
    }

    /// Advance the contract's exit queue by at most `job.batch_size` entries.
    /// Callers repeat this until the queue is drained.
    pub async fn process_exits(&self, job: &ExitProcessingJob) -> Result<H256> {
        process_exits(&self.chain, job).await
    }
}

/// One call to the contract's exit processing entry point, no retry or loop
pub async fn process_exits<C: RootChain + ?Sized>(chain: &C, job: &ExitProcessingJob) -> Result<H256> {
    job.validate()?;
    log::info!(
        "processing up to {} exits for token {:?}",
        job.batch_size,
        job.token
    );
    chain.process_exits(job).await
}

fn advance(state: ExitState, next: ExitState) -> Result<ExitState> {
    state
        .advance(next)
        .ok_or(Error::IllegalExitTransition { from: state, to: next })
}
