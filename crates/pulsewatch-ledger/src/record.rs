//! Execution records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// The endpoint answered with a non-error status.
    Succeeded,
    /// The request failed or the endpoint answered 4xx/5xx.
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = LedgerError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCEEDED" => Ok(ExecutionStatus::Succeeded),
            "FAILED" => Ok(ExecutionStatus::Failed),
            _ => Err(LedgerError::InvalidStatus(s.to_string())),
        }
    }
}

/// A persisted execution. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Monotonic surrogate key.
    pub id: i64,
    /// Public identifier assigned at persistence time.
    pub external_id: Uuid,
    /// Name of the job at fire time.
    pub job_name: String,
    /// URL that was probed.
    pub url: String,
    pub status: ExecutionStatus,
    /// Wall-clock duration of the probe in milliseconds.
    pub response_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_date: DateTime<Utc>,
    /// Correlation id of the execution that produced the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// An execution about to be appended. The store assigns ids and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExecution {
    pub job_name: String,
    pub url: String,
    pub status: ExecutionStatus,
    pub response_time: u64,
    pub error_message: Option<String>,
    pub trace_id: Option<String>,
}

impl NewExecution {
    /// A successful probe.
    pub fn succeeded(job_name: impl Into<String>, url: impl Into<String>, response_time: u64) -> Self {
        Self {
            job_name: job_name.into(),
            url: url.into(),
            status: ExecutionStatus::Succeeded,
            response_time,
            error_message: None,
            trace_id: None,
        }
    }

    /// A failed probe with a short description of the failure.
    pub fn failed(
        job_name: impl Into<String>,
        url: impl Into<String>,
        response_time: u64,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            url: url.into(),
            status: ExecutionStatus::Failed,
            response_time,
            error_message: Some(error_message.into()),
            trace_id: None,
        }
    }

    /// Attach a correlation id.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Materialize into a record with store-assigned fields.
    pub(crate) fn into_record(
        self,
        id: i64,
        external_id: Uuid,
        created_date: DateTime<Utc>,
    ) -> ExecutionRecord {
        ExecutionRecord {
            id,
            external_id,
            job_name: self.job_name,
            url: self.url,
            status: self.status,
            response_time: self.response_time,
            error_message: self.error_message,
            created_date,
            trace_id: self.trace_id,
        }
    }
}
