use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use courier::{Environment, EnvironmentConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod sub_commands;

const DEFAULT_CONFIG_FILE: &str = "courier.toml";

/// Send requests to a configured environment
#[derive(Parser)]
#[command(name = "courier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Environment config file (TOML or JSON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Logging level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the JSON response
    Request(sub_commands::request::RequestSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = EnvironmentConfig::from_file(&args.config)?;
    let environment = Environment::try_from(settings)?;
    tracing::debug!("Using environment {:?}", environment);

    match &args.command {
        Commands::Request(sub_command_args) => {
            sub_commands::request::request(environment, sub_command_args).await
        }
    }
}
