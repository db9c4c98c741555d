//! Scheduler errors.

use thiserror::Error;

/// Scheduler error types.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The registry already holds the maximum number of jobs.
    #[error("Max number of jobs reached ({0}), please update the limit if needed")]
    MaxJobsReached(usize),

    /// A job with this name is already registered.
    #[error("Job with name '{0}' already exists")]
    JobAlreadyExists(String),

    /// A field of the job definition is invalid.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The scheduler has been shut down.
    #[error("Scheduler is shut down")]
    Stopped,
}

impl SchedulerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SchedulerError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
