//! hlscope - monitor trading agents' accounts and reasoning logs
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/hlscope/config.toml (~/.config/hlscope/config.toml)
//! - Agent data: $XDG_DATA_HOME/hlscope/agents/<agent_id>/ (overridable in config)
//! - Logs: $XDG_STATE_HOME/hlscope/hlscope.log (~/.local/state/hlscope/hlscope.log)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hlscope_core::{build_report, Config, ReasoningTracker, TelemetryAggregator};

#[derive(Parser)]
#[command(name = "hlscope")]
#[command(about = "Monitor trading agent accounts and reasoning logs")]
#[command(version)]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/hlscope/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Query mainnet regardless of configuration
    #[arg(long, global = true)]
    mainnet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the account snapshot for a wallet address
    Snapshot {
        /// Wallet address to query
        address: String,
    },

    /// Print reasoning from an agent's newest logs
    Cot {
        /// Agent id
        agent_id: String,

        /// Logs directory (default: <data_root>/<agent_id>/logs)
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },

    /// Print the combined agent report
    Report {
        /// Agent id
        agent_id: String,
    },

    /// Keep polling an agent's logs and print new reasoning as it appears
    Watch {
        /// Agent id
        agent_id: String,

        /// Logs directory (default: <data_root>/<agent_id>/logs)
        #[arg(long)]
        logs_dir: Option<PathBuf>,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "5000")]
        poll: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if args.mainnet {
        config.network.mainnet = true;
    }

    let _log_guard =
        hlscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(info_url = %config.network.info_url(), "hlscope starting");

    match args.command {
        Command::Snapshot { address } => run_snapshot(&config, &address).await,
        Command::Cot { agent_id, logs_dir } => {
            let logs_dir = logs_dir.unwrap_or_else(|| config.agent_logs_dir(&agent_id));
            let tracker = ReasoningTracker::new();
            let cot = tracker.poll_new_reasoning(&agent_id, &logs_dir).await;
            println!("{}", cot);
            Ok(())
        }
        Command::Report { agent_id } => run_report(&config, &agent_id).await,
        Command::Watch {
            agent_id,
            logs_dir,
            poll,
        } => {
            let logs_dir = logs_dir.unwrap_or_else(|| config.agent_logs_dir(&agent_id));
            run_watch(&agent_id, logs_dir, Duration::from_millis(poll.max(1))).await
        }
    }
}

async fn run_snapshot(config: &Config, address: &str) -> Result<()> {
    let aggregator = TelemetryAggregator::from_config(&config.network)
        .context("failed to create info client")?;

    let snapshot = aggregator
        .fetch_snapshot(address)
        .await
        .with_context(|| format!("failed to fetch snapshot for {}", address))?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn run_report(config: &Config, agent_id: &str) -> Result<()> {
    let aggregator = TelemetryAggregator::from_config(&config.network)
        .context("failed to create info client")?;
    let tracker = ReasoningTracker::new();

    let report = build_report(config, agent_id, &aggregator, &tracker)
        .await
        .with_context(|| format!("failed to build report for agent {}", agent_id))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Poll until Ctrl-C, printing each non-empty batch of reasoning.
async fn run_watch(agent_id: &str, logs_dir: PathBuf, interval: Duration) -> Result<()> {
    let tracker = ReasoningTracker::new();
    let mut ticker = tokio::time::interval(interval);

    println!(
        "Watching {} every {:?} (Ctrl-C to stop)",
        logs_dir.display(),
        interval
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cot = tracker.poll_new_reasoning(agent_id, &logs_dir).await;
                if !cot.is_empty() {
                    println!("{}", cot);
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    if let Some(watermark) = tracker.watermark(agent_id).await {
        tracing::info!(
            agent = agent_id,
            last_research_log = watermark.last_research_log,
            last_trade_log = watermark.last_trade_log,
            "Watch stopped"
        );
    }

    Ok(())
}
