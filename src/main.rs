use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mhx::config::Config;
use mhx::error::{AppError, AppResult};
use mhx::sim::Scenario;

#[derive(Debug, Parser)]
#[command(name = "mhx", about = "Replay modal/history sessions headlessly")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Run a TOML scenario and print the resulting history timeline.
    Replay {
        scenario: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        CliCommand::Replay { scenario, config } => {
            let config = match config {
                Some(path) => Config::load_from_path(path)?,
                None => Config::load()?,
            };
            let raw = tokio::fs::read_to_string(&scenario).await.map_err(|source| {
                AppError::io_with_context(
                    source,
                    format!("failed to read scenario: {}", scenario.display()),
                )
            })?;
            let report = Scenario::from_toml(&raw)?.run(&config)?;
            print!("{report}");
            Ok(())
        }
    }
}
