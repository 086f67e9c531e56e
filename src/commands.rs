//! Command implementations
//!
//! Each command takes its configuration by value and runs a strict sequence of
//! steps. Value movement follows key → address → resolve → build → sign → submit.
//! Everything that can be checked locally is checked before the first network call.

use secp256k1::SecretKey;
use web3::types::H256;

use crate::config::{
    AccountQueryConfig, DepositConfig, ExitConfig, ExitDataConfig, MergeConfig, ProcessConfig,
    SendConfig, SplitConfig, StatusConfig,
};
use crate::crypto::{address_from_secret, generate_account, parse_private_key, sign, Account};
use crate::error::{Result, ValidationError};
use crate::exit::{process_exits, ExitCoordinator, ExitProcessingJob, StartedExit};
use crate::rootchain::{Deposit, RootChain, RootChainContract};
use crate::transaction::builder::{MIN_MERGE_INPUTS, MIN_SPLIT_OUTPUTS};
use crate::transaction::{build, TransactionIntent, MAX_INPUTS, MAX_OUTPUTS};
use crate::utxo::{parse_address, parse_currency, Balance, Utxo};
use crate::watcher::{ExitData, SubmitReceipt, UtxoResolver, WatcherClient, WatcherStatus};

/// `get utxos`
pub async fn get_utxos(config: AccountQueryConfig) -> Result<Vec<Utxo>> {
    let owner = parse_address(&config.address)?;
    let resolver = UtxoResolver::new(WatcherClient::new(&config.watcher)?);
    resolver.get_utxos(owner).await
}

/// `get balance`
pub async fn get_balance(config: AccountQueryConfig) -> Result<Vec<Balance>> {
    let owner = parse_address(&config.address)?;
    let resolver = UtxoResolver::new(WatcherClient::new(&config.watcher)?);
    resolver.get_balance(owner).await
}

/// `get status`
pub async fn get_status(config: StatusConfig) -> Result<WatcherStatus> {
    WatcherClient::new(&config.watcher)?.get_status().await
}

/// `get exit`
pub async fn get_exit_data(config: ExitDataConfig) -> Result<ExitData> {
    WatcherClient::new(&config.watcher)?
        .get_exit_data(config.utxo_pos)
        .await
}

/// `send`: pay part or all of one UTXO to another owner
pub async fn send(config: SendConfig) -> Result<SubmitReceipt> {
    let secret_key = parse_private_key(&config.private_key)?;
    let from = address_from_secret(&secret_key);
    let to = parse_address(&config.to_owner)?;
    if config.amount == 0 {
        return Err(ValidationError::ZeroAmount.into());
    }

    let watcher = WatcherClient::new(&config.watcher)?;
    let input = UtxoResolver::new(watcher.clone())
        .resolve(from, config.from_utxo)
        .await?;

    let intent = TransactionIntent::Transfer {
        input,
        from,
        to,
        amount: config.amount,
    };
    sign_and_submit(&watcher, intent, &secret_key).await
}

/// `split`: spread one UTXO over 2 to 4 outputs
pub async fn split(config: SplitConfig) -> Result<SubmitReceipt> {
    let secret_key = parse_private_key(&config.private_key)?;
    let from = address_from_secret(&secret_key);
    let to = parse_address(&config.to_owner)?;
    if !(MIN_SPLIT_OUTPUTS..=MAX_OUTPUTS).contains(&config.outputs) {
        return Err(ValidationError::InvalidOutputCount {
            count: config.outputs,
            min: MIN_SPLIT_OUTPUTS,
            max: MAX_OUTPUTS,
        }
        .into());
    }

    let watcher = WatcherClient::new(&config.watcher)?;
    let input = UtxoResolver::new(watcher.clone())
        .resolve(from, config.from_utxo)
        .await?;

    let intent = TransactionIntent::Split {
        input,
        to,
        outputs: config.outputs,
    };
    sign_and_submit(&watcher, intent, &secret_key).await
}

/// `merge`: combine 2 to 4 UTXOs of the key's owner
pub async fn merge(config: MergeConfig) -> Result<SubmitReceipt> {
    let secret_key = parse_private_key(&config.private_key)?;
    let owner = address_from_secret(&secret_key);
    if !(MIN_MERGE_INPUTS..=MAX_INPUTS).contains(&config.from_utxos.len()) {
        return Err(ValidationError::InvalidInputCount {
            count: config.from_utxos.len(),
            min: MIN_MERGE_INPUTS,
            max: MAX_INPUTS,
        }
        .into());
    }
    for (i, position) in config.from_utxos.iter().enumerate() {
        if config.from_utxos[..i].contains(position) {
            return Err(ValidationError::DuplicateInput(*position).into());
        }
    }
    log::info!("merging {} UTXOs of {:?}", config.from_utxos.len(), owner);

    let watcher = WatcherClient::new(&config.watcher)?;
    let inputs = UtxoResolver::new(watcher.clone())
        .resolve_many(owner, &config.from_utxos)
        .await?;

    sign_and_submit(&watcher, TransactionIntent::Merge { inputs, owner }, &secret_key).await
}

/// `deposit`: move value from the root chain into the child chain
pub async fn deposit(config: DepositConfig) -> Result<H256> {
    let contract = parse_address(&config.contract)?;
    let deposit = Deposit {
        owner: parse_address(&config.owner)?,
        currency: parse_currency(&config.currency)?,
        amount: config.amount,
    };
    if deposit.amount == 0 {
        return Err(ValidationError::ZeroAmount.into());
    }

    let chain = RootChainContract::new(&config.chain)?;
    chain.deposit(contract, &deposit).await
}

/// `exit`: start a standard exit of one UTXO
pub async fn exit(config: ExitConfig) -> Result<StartedExit> {
    let contract = parse_address(&config.contract)?;
    let chain = RootChainContract::new(&config.chain)?;
    let coordinator = ExitCoordinator::new(WatcherClient::new(&config.watcher)?, chain);

    coordinator
        .start_standard_exit(config.utxo_pos, contract, config.exit_bond)
        .await
}

/// `process`: one bounded round of exit processing
pub async fn process(config: ProcessConfig) -> Result<H256> {
    let contract = parse_address(&config.contract)?;
    let token = parse_currency(&config.token)?;
    let job = ExitProcessingJob::new(contract, token, config.batch_size)?;

    let chain = RootChainContract::new(&config.chain)?;
    process_exits(&chain, &job).await
}

/// `create account`
pub fn create_account() -> Account {
    generate_account()
}

async fn sign_and_submit(
    watcher: &WatcherClient,
    intent: TransactionIntent,
    secret_key: &SecretKey,
) -> Result<SubmitReceipt> {
    let transaction = build(intent)?;
    let signed = sign(transaction, secret_key);
    watcher.submit(&signed).await
}
