//! Drives the election ledger from files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tally_ledger_runner::replay::{build_ledger, load_genesis, load_script, replay};
use tally_ledger_runner::{from_toml_path, LedgerConfig};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates an election and replays a transaction script against it.
    Replay {
        /// The path to the ledger config.
        #[arg(long, default_value = "ledger_config.toml")]
        config: PathBuf,

        /// The path to the election genesis (JSON).
        #[arg(long)]
        genesis: PathBuf,

        /// The path to the transaction script (JSON).
        #[arg(long)]
        transactions: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Logs go to stderr, stdout carries the JSON report.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Replay {
            config,
            genesis,
            transactions,
        } => run_replay(config, genesis, transactions).await,
    }
}

async fn run_replay(
    config_path: PathBuf,
    genesis_path: PathBuf,
    transactions_path: PathBuf,
) -> Result<(), anyhow::Error> {
    info!("Reading ledger config from {config_path:?}");
    let config: LedgerConfig =
        from_toml_path(&config_path).context("Failed to read ledger configuration")?;
    let genesis = load_genesis(&genesis_path).context("Failed to read election genesis")?;
    let script = load_script(&transactions_path).context("Failed to read transaction script")?;

    let (ledger, clock) = build_ledger(&config)?;
    ledger.genesis(&genesis).await?;

    let report = replay(&ledger, clock.as_deref(), script).await?;
    report.write_json(std::io::stdout().lock())?;

    Ok(())
}
