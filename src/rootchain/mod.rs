//! Root Chain Module
//!
//! The [`RootChain`] trait is the seam to the Plasma contract on Ethereum. The
//! [`RootChainContract`] implementation signs raw transactions locally with the
//! configured key and hands them to the Ethereum client. Each call is a single
//! attempt; confirmation is left to the caller.

use async_trait::async_trait;
use web3::signing::{SecretKey, SecretKeyRef};
use web3::transports::Http;
use web3::types::{Address, Bytes, TransactionParameters, H256, U256};
use web3::Web3;

use crate::config::ChainConfig;
use crate::crypto::{address_from_secret, parse_private_key};
use crate::error::{Error, Result, ValidationError};
use crate::exit::{ExitProcessingJob, ExitRequest};
use crate::transaction::encode_deposit;
use crate::utxo::{currency_label, ETH_CURRENCY};

pub mod abi;

/// Value moved from the root chain into the child chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    pub owner: Address,
    pub currency: Address,
    pub amount: u128,
}

impl Deposit {
    /// Calldata and attached value of the deposit call. ETH goes through the
    /// payable `deposit`, tokens through `depositFrom` with no value.
    pub fn call(&self) -> (Vec<u8>, U256) {
        let deposit_tx = encode_deposit(self.owner, self.currency, self.amount);
        if self.currency == ETH_CURRENCY {
            (abi::deposit(deposit_tx), U256::from(self.amount))
        } else {
            (abi::deposit_from(deposit_tx), U256::zero())
        }
    }
}

/// Contract entry points used by the client
#[async_trait]
pub trait RootChain: Send + Sync {
    /// Deposit into the contract at `contract`
    async fn deposit(&self, contract: Address, deposit: &Deposit) -> Result<H256>;

    /// Start a standard exit, paying the request's bond
    async fn start_standard_exit(&self, request: &ExitRequest) -> Result<H256>;

    /// Process up to `job.batch_size` matured exits of `job.token`
    async fn process_exits(&self, job: &ExitProcessingJob) -> Result<H256>;
}

/// Root chain contract reached through an Ethereum JSON-RPC client
pub struct RootChainContract {
    web3: Web3<Http>,
    endpoint: String,
    signing_key: SecretKey,
    sender: Address,
    gas_limit: u64,
}

impl RootChainContract {
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let secret_key = parse_private_key(&config.private_key)?;
        let sender = address_from_secret(&secret_key);
        let signing_key = SecretKey::from_slice(&secret_key.secret_bytes())
            .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;

        let transport = Http::new(&config.client_url).map_err(|e| Error::Unreachable {
            endpoint: config.client_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            web3: Web3::new(transport),
            endpoint: config.client_url.clone(),
            signing_key,
            sender,
            gas_limit: config.gas_limit,
        })
    }

    /// Account paying for gas
    pub fn sender(&self) -> Address {
        self.sender
    }

    async fn send(&self, contract: Address, data: Vec<u8>, value: U256) -> Result<H256> {
        let params = TransactionParameters {
            to: Some(contract),
            value,
            gas: U256::from(self.gas_limit),
            data: Bytes(data),
            ..Default::default()
        };

        let signed = self
            .web3
            .accounts()
            .sign_transaction(params, SecretKeyRef::new(&self.signing_key))
            .await
            .map_err(|e| self.chain_error(e))?;

        let tx_hash = self
            .web3
            .eth()
            .send_raw_transaction(signed.raw_transaction)
            .await
            .map_err(|e| self.chain_error(e))?;

        log::info!("sent {:?} from {:?} to contract {:?}", tx_hash, self.sender, contract);
        Ok(tx_hash)
    }

    fn chain_error(&self, err: web3::Error) -> Error {
        match err {
            web3::Error::Transport(e) => Error::Unreachable {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            },
            other => Error::ContractCall(other.to_string()),
        }
    }
}

#[async_trait]
impl RootChain for RootChainContract {
    async fn deposit(&self, contract: Address, deposit: &Deposit) -> Result<H256> {
        log::info!(
            "depositing {} {} for {:?}",
            deposit.amount,
            currency_label(&deposit.currency),
            deposit.owner
        );

        let (data, value) = deposit.call();
        self.send(contract, data, value).await
    }

    async fn start_standard_exit(&self, request: &ExitRequest) -> Result<H256> {
        let data = abi::start_standard_exit(
            request.utxo_pos,
            request.output_tx.clone(),
            request.proof.clone(),
        );
        self.send(request.contract, data, U256::from(request.bond))
            .await
    }

    async fn process_exits(&self, job: &ExitProcessingJob) -> Result<H256> {
        let data = abi::process_exits(job.token, 0, job.batch_size);
        self.send(job.contract, data, U256::zero()).await
    }
}
