//! Monitor errors.

use thiserror::Error;

/// Monitor error types.
///
/// Probe failures never surface here; they are written to the ledger as
/// `FAILED` executions.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
