//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Base directory for runtime state (`~/.pulsewatch`).
pub fn pulsewatch_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pulsewatch"))
        .unwrap_or_else(|| PathBuf::from(".pulsewatch"))
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Scheduler configuration for monitoring jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of jobs registered at the same time.
    #[serde(default = "default_max_jobs_allowed")]
    pub max_jobs_allowed: usize,

    /// Maximum number of probes running at the same time.
    #[serde(default = "default_max_concurrent_executions")]
    pub max_concurrent_executions: usize,

    /// Jobs admitted at startup.
    #[serde(default)]
    pub jobs: Vec<ScheduledJob>,
}

fn default_max_jobs_allowed() -> usize {
    5
}

fn default_max_concurrent_executions() -> usize {
    10
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_jobs_allowed: default_max_jobs_allowed(),
            max_concurrent_executions: default_max_concurrent_executions(),
            jobs: Vec::new(),
        }
    }
}

/// A job declared in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Unique job name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// URL probed on every firing.
    pub url: String,
    /// Cron expression (6 or 7 fields, seconds first).
    pub cron_expression: String,
    /// IANA timezone the expression is evaluated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Per-probe timeout. Unset means the probe waits for the remote end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_timeout_secs: Option<u64>,

    /// User agent sent with every probe.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("pulsewatch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Execution ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// SQLite database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Largest page a query may request, also the default page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_page_size: default_max_page_size(),
        }
    }
}

impl LedgerConfig {
    /// Database path with `~` expanded, falling back to `~/.pulsewatch/ledger.db`.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(p) => PathBuf::from(ConfigLoader::expand_path(&p.to_string_lossy())),
            None => pulsewatch_dir().join("ledger.db"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Log directory with `~` expanded, falling back to `~/.pulsewatch/logs`.
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(p) => PathBuf::from(ConfigLoader::expand_path(&p.to_string_lossy())),
            None => pulsewatch_dir().join("logs"),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
