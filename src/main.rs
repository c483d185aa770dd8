//! qearn: command-line access to the QEARN staking contract
//!
//! Read-only queries and history run against the public RPC. Lock and
//! unlock are dry runs: the transaction request is printed for a wallet to
//! sign, since seeds never pass through this tool.

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use qearn_client::{
    ContractClient, HistoryAggregator, HttpRpcClient, Identity, LockQueryService, QearnConfig,
    TransactionBuilder,
};

#[derive(Parser)]
#[command(name = "qearn")]
#[command(about = "Query and prepare QEARN staking operations")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "qearn.toml")]
    config: String,

    /// RPC base URL (overrides config file)
    #[arg(long, env = "QEARN_RPC_URL")]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current tick and epoch
    Tick,
    /// Aggregate lock and bonus amounts of an epoch
    EpochInfo { epoch: u32 },
    /// Amount an identity locked in an epoch
    UserLock { identity: Identity, epoch: u32 },
    /// Lock history of one or more identities, one JSON record per line
    History {
        /// Last epoch of the window (defaults to the current epoch)
        #[arg(long)]
        latest_epoch: Option<u32>,
        #[arg(required = true)]
        identities: Vec<Identity>,
    },
    /// Print a lock transaction request scheduled from the current tick
    BuildLock { identity: Identity, amount: u64 },
    /// Print an unlock transaction request scheduled from the current tick
    BuildUnlock {
        identity: Identity,
        amount: u64,
        epoch: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qearn_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if Path::new(&cli.config).exists() {
        QearnConfig::from_file(&cli.config)?
    } else {
        info!("Config file {} not found, using defaults", cli.config);
        QearnConfig::default()
    };
    if let Some(url) = cli.rpc_url {
        config.rpc.base_url = url;
    }

    let rpc = Arc::new(HttpRpcClient::new(config.rpc.clone())?);
    let client = ContractClient::new(rpc.clone()).with_tick_source(rpc);
    let queries = LockQueryService::with_protocol(client.clone(), config.protocol.clone());

    match cli.command {
        Command::Tick => {
            let tick = client.current_tick().await?;
            println!("tick {} epoch {}", tick.tick, tick.epoch);
        }
        Command::EpochInfo { epoch } => {
            let info = queries.get_lock_info_per_epoch(epoch).await?;
            println!("{}", serde_json::to_string(&info)?);
        }
        Command::UserLock { identity, epoch } => {
            let amount = queries.get_user_lock_info(&identity, epoch).await?;
            println!("{}", amount);
        }
        Command::History {
            latest_epoch,
            identities,
        } => {
            let latest_epoch = match latest_epoch {
                Some(epoch) => epoch,
                None => client.current_tick().await?.epoch,
            };
            let history = HistoryAggregator::new(queries)
                .with_config(config.history.clone())
                .aggregate(&identities, latest_epoch)
                .await?;
            for (identity, records) in &history.identities {
                for record in records {
                    println!(
                        "{}",
                        serde_json::json!({ "identity": identity, "record": record })
                    );
                }
            }
        }
        Command::BuildLock { identity, amount } => {
            let builder = TransactionBuilder::with_protocol(client.clone(), config.protocol);
            let tick = client.current_tick().await?;
            let request = builder.build_lock(&identity, amount, builder.expiry_tick(tick.tick))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::BuildUnlock {
            identity,
            amount,
            epoch,
        } => {
            let builder = TransactionBuilder::with_protocol(client.clone(), config.protocol);
            let tick = client.current_tick().await?;
            let request =
                builder.build_unlock(&identity, amount, epoch, builder.expiry_tick(tick.tick))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}
