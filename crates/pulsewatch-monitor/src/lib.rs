//! # Pulsewatch Monitor
//!
//! The unit of work run on every trigger firing: one timed HTTP GET against
//! a job's URL, recorded as exactly one ledger entry.

mod error;
mod executor;
mod monitor;

pub use error::MonitorError;
pub use executor::JobExecutor;
pub use monitor::{UrlMonitor, short_error_message};
