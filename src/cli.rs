//! CLI definitions for Pulsewatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pulsewatch CLI.
#[derive(Parser)]
#[command(name = "pulsewatch")]
#[command(about = "Cron-scheduled URL health checks with a queryable execution ledger")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to ~/.pulsewatch/config.toml)
    #[arg(short, long, env = "PULSEWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration file and exit
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["pulsewatch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "pulsewatch",
            "--config",
            "/etc/pulsewatch.toml",
            "run",
            "--port",
            "9000",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pulsewatch.toml")));
        assert_eq!(
            cli.command,
            Some(Commands::Run {
                host: None,
                port: Some(9000)
            })
        );
    }

    #[test]
    fn test_check_config() {
        let cli = Cli::try_parse_from(["pulsewatch", "check-config", "-c", "p.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
    }
}
