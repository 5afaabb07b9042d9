use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

pub mod cmd;
pub mod config;
pub mod engine;
pub mod identity;
pub mod utils;

/// CLI arguments for configuring trafficgen behavior.
#[derive(Debug, Clone, Parser)]
#[command(name = "trafficgen")]
#[command(bin_name = "trafficgen")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    cmds: CliCommands,

    /// debug logging as default instead of Info; use RUST_LOG env for more options
    #[arg(long, short = 'v', default_value_t = false, global = true)]
    pub verbose: bool,

    /// enable pretty logging (format for humans)
    #[arg(long, default_value_t = false, global = true)]
    pub pretty: bool,

    /// write the tracing output to the provided (log) file instead of stderr
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "SECONDS", default_value_t = 0., global = true)]
    /// the graceful shutdown timeout (<= 0.0 = no timeout)
    pub graceful: f64,
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommands {
    Run(self::cmd::run::RunCommand),
    Mock(self::cmd::mock::MockCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    utils::telemetry::init_tracing(&args)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("shutdown signal received");
                    cancel.cancel();
                }
                Err(err) => tracing::error!("failed to listen for the shutdown signal: {err}"),
            }
        });
    }

    if let Err(err) = run_with_args(cancel, args).await {
        eprintln!("🚩 exit with error: {err:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_with_args(cancel: CancellationToken, args: Args) -> Result<()> {
    let graceful = (args.graceful > 0.).then(|| Duration::from_secs_f64(args.graceful));

    match args.cmds {
        CliCommands::Run(run_args) => self::cmd::run::exec(cancel, graceful, run_args).await,
        CliCommands::Mock(mock_args) => self::cmd::mock::exec(cancel, mock_args).await,
    }
}
