//! Higgler API server binary.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use higgler_api::config::{load_config, ApiConfig};
use higgler_api::lifecycle::{self, Shutdown};
use higgler_api::observability;
use higgler_api::routes;

#[derive(Parser)]
#[command(name = "higgler-api")]
#[command(about = "Group-buying API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// TOML config file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the route table in match order
    Routes,
    /// Validate a config file and exit
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn read_config(path: Option<&Path>) -> Result<ApiConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(ApiConfig::default()),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve { config } => {
            let config = read_config(config.as_deref())?;
            observability::init_logging(&config.observability);
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                bind_address = %config.listener.bind_address,
                seeded = config.seed_path.is_some(),
                "higgler-api starting"
            );
            lifecycle::serve(config, Shutdown::new()).await?;
            tracing::info!("Shutdown complete");
        }
        Commands::Routes => {
            for route in routes::draw()?.routes() {
                println!("{route}");
            }
        }
        Commands::Check { config } => {
            load_config(&config)?;
            println!("{}: ok", config.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
