//! Plasma MoreVP command line client
//!
//! Every subcommand maps onto one operation in `plasma_cli::commands`.
//! Flags can also be supplied through `PLASMA_*` environment variables.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plasma_cli::commands;
use plasma_cli::config::{
    AccountQueryConfig, ChainConfig, DepositConfig, ExitConfig, ExitDataConfig, MergeConfig,
    ProcessConfig, SendConfig, SplitConfig, StatusConfig, WatcherConfig, DEFAULT_EXIT_BOND,
    DEFAULT_GAS_LIMIT, DEFAULT_PROCESS_BATCH, DEFAULT_REQUEST_TIMEOUT_SECS,
};

mod display;

#[derive(Parser)]
#[command(name = "plasma-cli", version, about = "Client for the Plasma MoreVP network")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Get a resource
    Get {
        #[command(subcommand)]
        resource: GetCommand,
    },
    /// Deposit ETH or ERC20 into the Plasma MoreVP contract
    Deposit(DepositArgs),
    /// Send part or all of a UTXO to a new owner
    Send(SendArgs),
    /// Split a UTXO into 2 to 4 outputs
    Split(SplitArgs),
    /// Merge 2 to 4 UTXOs into one
    Merge(MergeArgs),
    /// Start a standard exit of a UTXO back to the root chain
    Exit(ExitArgs),
    /// Process exits that have completed the challenge period
    Process(ProcessArgs),
    /// Create a resource
    Create {
        #[command(subcommand)]
        resource: CreateCommand,
    },
}

#[derive(Subcommand)]
enum GetCommand {
    /// Retrieve UTXO data from the watcher
    Utxos(AccountArgs),
    /// Retrieve the balance of an address from the watcher
    Balance(AccountArgs),
    /// Get status from the watcher
    Status(WatcherArgs),
    /// Get UTXO exit information
    Exit(GetExitArgs),
}

#[derive(Subcommand)]
enum CreateCommand {
    /// Create an account consisting of a public and private key
    Account,
}

#[derive(Args)]
struct WatcherArgs {
    /// Watcher URL, e.g. https://watcher.path.net
    #[arg(long = "watcher", env = "PLASMA_WATCHER")]
    url: String,

    /// Timeout of a single watcher request in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "PLASMA_WATCHER_TIMEOUT")]
    timeout: u64,
}

impl From<WatcherArgs> for WatcherConfig {
    fn from(args: WatcherArgs) -> Self {
        WatcherConfig {
            url: args.url,
            request_timeout: Duration::from_secs(args.timeout),
        }
    }
}

#[derive(Args)]
struct ChainArgs {
    /// Ethereum client URL, e.g. http://localhost:8545
    #[arg(long, env = "PLASMA_CLIENT")]
    client: String,

    /// Private key paying for gas
    #[arg(long = "privatekey", env = "PLASMA_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Gas limit of the contract call
    #[arg(long, default_value_t = DEFAULT_GAS_LIMIT, env = "PLASMA_GAS_LIMIT")]
    gas: u64,
}

impl From<ChainArgs> for ChainConfig {
    fn from(args: ChainArgs) -> Self {
        ChainConfig {
            client_url: args.client,
            private_key: args.private_key,
            gas_limit: args.gas,
        }
    }
}

#[derive(Args)]
struct AccountArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    /// Owner address
    #[arg(long)]
    address: String,
}

#[derive(Args)]
struct GetExitArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    /// UTXO position
    #[arg(long)]
    utxo: u64,
}

#[derive(Args)]
struct DepositArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Address of the Plasma MoreVP contract
    #[arg(long, env = "PLASMA_CONTRACT")]
    contract: String,

    /// Owner of the deposited UTXO
    #[arg(long)]
    owner: String,

    /// Amount to deposit in the currency's smallest unit
    #[arg(long)]
    amount: u128,

    /// `ETH` or an ERC20 token address
    #[arg(long)]
    currency: String,
}

#[derive(Args)]
struct SendArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    /// Private key of the owner of the UTXO
    #[arg(long = "privatekey", env = "PLASMA_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// UTXO position to send from
    #[arg(long = "fromutxo")]
    from_utxo: u64,

    /// New owner of the value
    #[arg(long = "toowner")]
    to_owner: String,

    /// Amount to send
    #[arg(long = "toamount")]
    to_amount: u128,
}

#[derive(Args)]
struct SplitArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    /// Private key of the owner of the UTXO
    #[arg(long = "privatekey", env = "PLASMA_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// UTXO position to split
    #[arg(long = "fromutxo")]
    from_utxo: u64,

    /// Owner of the new outputs
    #[arg(long = "toowner")]
    to_owner: String,

    /// Number of outputs, 2 to 4
    #[arg(long)]
    outputs: usize,
}

#[derive(Args)]
struct MergeArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    /// Private key of the owner of the UTXOs
    #[arg(long = "privatekey", env = "PLASMA_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// UTXO positions to merge, repeated or comma separated
    #[arg(long = "fromutxo", value_delimiter = ',', required = true)]
    from_utxos: Vec<u64>,
}

#[derive(Args)]
struct ExitArgs {
    #[command(flatten)]
    watcher: WatcherArgs,

    #[command(flatten)]
    chain: ChainArgs,

    /// Address of the Plasma MoreVP contract
    #[arg(long, env = "PLASMA_CONTRACT")]
    contract: String,

    /// UTXO position to exit
    #[arg(long)]
    utxo: u64,

    /// Exit bond in wei
    #[arg(long, default_value_t = DEFAULT_EXIT_BOND)]
    bond: u128,
}

#[derive(Args)]
struct ProcessArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Address of the Plasma MoreVP contract
    #[arg(long, env = "PLASMA_CONTRACT")]
    contract: String,

    /// Token whose exits are processed, `ETH` or an ERC20 address
    #[arg(long)]
    token: String,

    /// Maximum number of exits processed by this call
    #[arg(long, default_value_t = DEFAULT_PROCESS_BATCH, allow_negative_numbers = true)]
    batch: i64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Get { resource } => get(resource).await?,
        Command::Deposit(args) => {
            let config = DepositConfig {
                chain: args.chain.into(),
                contract: args.contract,
                owner: args.owner,
                amount: args.amount,
                currency: args.currency,
            };
            let tx_hash = commands::deposit(config).await.context("deposit failed")?;
            println!("Deposit transaction {:?}", tx_hash);
        }
        Command::Send(args) => {
            let config = SendConfig {
                watcher: args.watcher.into(),
                private_key: args.private_key,
                from_utxo: args.from_utxo,
                to_owner: args.to_owner,
                amount: args.to_amount,
            };
            let receipt = commands::send(config).await.context("send failed")?;
            display::receipt(&receipt);
        }
        Command::Split(args) => {
            let config = SplitConfig {
                watcher: args.watcher.into(),
                private_key: args.private_key,
                from_utxo: args.from_utxo,
                to_owner: args.to_owner,
                outputs: args.outputs,
            };
            let receipt = commands::split(config).await.context("split failed")?;
            display::receipt(&receipt);
        }
        Command::Merge(args) => {
            let config = MergeConfig {
                watcher: args.watcher.into(),
                private_key: args.private_key,
                from_utxos: args.from_utxos,
            };
            let receipt = commands::merge(config).await.context("merge failed")?;
            display::receipt(&receipt);
        }
        Command::Exit(args) => {
            log::info!("Attempting to exit UTXO {}", args.utxo);
            let config = ExitConfig {
                watcher: args.watcher.into(),
                chain: args.chain.into(),
                contract: args.contract,
                utxo_pos: args.utxo,
                exit_bond: args.bond,
            };
            let started = commands::exit(config).await.context("exit failed")?;
            display::started_exit(&started);
        }
        Command::Process(args) => {
            log::info!("Calling process exits in the Plasma contract");
            let config = ProcessConfig {
                chain: args.chain.into(),
                contract: args.contract,
                token: args.token,
                batch_size: args.batch,
            };
            let tx_hash = commands::process(config)
                .await
                .context("process exits failed")?;
            println!("Process exits transaction {:?}", tx_hash);
        }
        Command::Create {
            resource: CreateCommand::Account,
        } => {
            log::info!("Generating keypair");
            display::account(&commands::create_account());
        }
    }
    Ok(())
}

async fn get(resource: GetCommand) -> Result<()> {
    match resource {
        GetCommand::Utxos(args) => {
            let config = AccountQueryConfig {
                watcher: args.watcher.into(),
                address: args.address,
            };
            let utxos = commands::get_utxos(config)
                .await
                .context("failed to get UTXOs")?;
            display::utxos(&utxos);
        }
        GetCommand::Balance(args) => {
            let config = AccountQueryConfig {
                watcher: args.watcher.into(),
                address: args.address,
            };
            let balance = commands::get_balance(config)
                .await
                .context("failed to get balance")?;
            display::balance(&balance);
        }
        GetCommand::Status(args) => {
            let config = StatusConfig {
                watcher: args.into(),
            };
            let status = commands::get_status(config)
                .await
                .context("failed to get watcher status")?;
            display::status(&status);
        }
        GetCommand::Exit(args) => {
            log::info!("Getting UTXO exit data");
            let config = ExitDataConfig {
                watcher: args.watcher.into(),
                utxo_pos: args.utxo,
            };
            // Missing exit data is reported but does not fail the process
            match commands::get_exit_data(config).await {
                Ok(data) => display::exit_data(&data),
                Err(e) => log::warn!("{}", e),
            }
        }
    }
    Ok(())
}
