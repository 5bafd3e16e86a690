//! Command-line entry point that provisions a dBank ledger.

use std::path::PathBuf;

use clap::Parser;
use dbank_common::clock::SystemClock;
use dbank_deployer::{logging, provision, DeployConfig, Network};

#[derive(Parser)]
#[command(name = "dbank-deploy", about = "Publish the DBC token and custody bank")]
struct Cli {
    /// Network to deploy to. Defaults to the config file's value.
    #[arg(long, value_enum, env = "DBANK_NETWORK")]
    network: Option<Network>,

    /// Hex-encoded operator key for production networks.
    #[arg(long, env = "DBANK_FROM_KEY", hide_env_values = true)]
    from_key: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DBANK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the deployment report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DeployConfig::from_toml_file(path)?,
        None => DeployConfig::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(key) = cli.from_key {
        config.from_key = Some(key);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    logging::init_tracing(&config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let deployment = provision(&config, &SystemClock)?;
    let report = deployment.report();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("TOKEN DEPLOYED AT {}", report.token);
        println!("BANK DEPLOYED AT {}", report.bank);
    }

    Ok(())
}
