//! RelayCredit CLI - Main entry point

use clap::{Parser, Subcommand};
use relaycredit_rpc::{commands, ScenarioConfig};
use relaycredit_settlement::EngineConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "relaycredit")]
#[command(about = "RelayCredit - Relayed peer-to-peer credit ledger", long_about = None)]
struct Cli {
    /// Engine config JSON (replaces the scenario's `engine` section)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the final ledger
    Run {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Also print committed events
        #[arg(long)]
        events: bool,
    },

    /// Run a scenario and print one account
    Inspect {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Account ID (will be uppercased)
        #[arg(long)]
        account: String,
    },

    /// Replay a scenario twice and check the ledger digest matches
    Verify {
        /// Scenario JSON file
        scenario: PathBuf,
    },
}

fn load(scenario: &Path, engine: Option<&Path>) -> anyhow::Result<ScenarioConfig> {
    let mut config = ScenarioConfig::from_file(scenario)?;
    if let Some(path) = engine {
        config.engine = EngineConfig::from_file(path)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let engine_config = cli.config.as_deref();

    match cli.command {
        Commands::Run { scenario, events } => {
            let config = load(&scenario, engine_config)?;
            commands::run(&config, events).await?;
        }

        Commands::Inspect { scenario, account } => {
            let config = load(&scenario, engine_config)?;
            let account = account.parse()?;
            commands::inspect(&config, &account).await?;
        }

        Commands::Verify { scenario } => {
            let config = load(&scenario, engine_config)?;
            commands::verify(&config).await?;
        }
    }

    Ok(())
}
