//! Pulsewatch - cron-scheduled URL monitoring.
//!
//! Main entry point for the Pulsewatch CLI and server.

mod cli;
mod server;

use std::path::{Path, PathBuf};

use clap::Parser;

use pulsewatch_config::{Config, ConfigLoader, ConfigValidator, pulsewatch_dir};

use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config_path, mut config) = match cli.config {
        Some(path) => {
            let config = ConfigLoader::load(&path)?;
            (path, config)
        }
        None => {
            let path = default_config_path();
            let config = ConfigLoader::load_or_default(&path)?;
            (path, config)
        }
    };

    match cli.command.unwrap_or(Commands::Run {
        host: None,
        port: None,
    }) {
        Commands::Run { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.logging)?;
            run_server(config).await
        }
        Commands::CheckConfig => check_config(&config_path, &config),
    }
}

fn default_config_path() -> PathBuf {
    pulsewatch_dir().join("config.toml")
}

/// Print validation problems and fail if there are errors.
fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    result.into_result()?;
    println!("{}: OK ({} job(s) declared)", path.display(), config.scheduler.jobs.len());
    Ok(())
}
