//! API error types and their problem-details rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use pulsewatch_ledger::LedgerError;
use pulsewatch_scheduler::SchedulerError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A query parameter could not be parsed.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    /// The request body could not be read as JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// One offending request parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidParam {
    pub name: String,
    pub reason: String,
}

/// RFC 7807 style error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub code: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_params: Vec<InvalidParam>,
}

impl ProblemDetails {
    fn new(status: StatusCode, code: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: "about:blank".to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            code: code.to_string(),
            detail: detail.into(),
            invalid_params: Vec::new(),
        }
    }

    fn with_param(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.invalid_params.push(InvalidParam {
            name: name.into(),
            reason: reason.into(),
        });
        self
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Scheduler(SchedulerError::MaxJobsReached(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Scheduler(SchedulerError::JobAlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Scheduler(SchedulerError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Scheduler(SchedulerError::Stopped) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Ledger(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            ApiError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidParam { .. } | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Problem-details body for this error.
    pub fn problem(&self) -> ProblemDetails {
        let status = self.status();
        let detail = self.to_string();
        match self {
            ApiError::Scheduler(SchedulerError::MaxJobsReached(_)) => {
                ProblemDetails::new(status, "max_jobs_reach", detail)
            }
            ApiError::Scheduler(SchedulerError::JobAlreadyExists(_)) => {
                ProblemDetails::new(status, "job_already_exists", detail)
            }
            ApiError::Scheduler(SchedulerError::InvalidInput { field, reason }) => {
                ProblemDetails::new(status, "invalid_request_params", "Invalid request parameters")
                    .with_param(*field, reason.clone())
            }
            ApiError::Scheduler(SchedulerError::Stopped) => {
                ProblemDetails::new(status, "service_unavailable", detail)
            }
            ApiError::Ledger(LedgerError::InvalidDateRange) => {
                ProblemDetails::new(status, "invalid_date_range", detail)
            }
            ApiError::Ledger(e) => match e.param_name() {
                Some(name) => {
                    ProblemDetails::new(status, "invalid_request_params", "Invalid request parameters")
                        .with_param(name, detail)
                }
                None => ProblemDetails::new(
                    status,
                    "internal_server_error",
                    "An unexpected error occurred",
                ),
            },
            ApiError::InvalidParam { name, reason } => {
                ProblemDetails::new(status, "invalid_request_params", "Invalid request parameters")
                    .with_param(*name, reason.clone())
            }
            ApiError::InvalidBody(_) => ProblemDetails::new(status, "invalid_request_params", detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(self.problem())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_errors_map_to_status() {
        let err = ApiError::from(SchedulerError::MaxJobsReached(5));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.problem().code, "max_jobs_reach");

        let err = ApiError::from(SchedulerError::JobAlreadyExists("ping".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.problem().code, "job_already_exists");
    }

    #[test]
    fn test_invalid_input_lists_param() {
        let err = ApiError::from(SchedulerError::InvalidInput {
            field: "cronExpression",
            reason: "not a cron".into(),
        });
        let problem = err.problem();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.code, "invalid_request_params");
        assert_eq!(problem.invalid_params[0].name, "cronExpression");
    }

    #[test]
    fn test_ledger_errors() {
        let err = ApiError::from(LedgerError::InvalidDateRange);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.problem().code, "invalid_date_range");

        let err = ApiError::from(LedgerError::Query("disk I/O error".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let problem = err.problem();
        assert_eq!(problem.code, "internal_server_error");
        assert!(!problem.detail.contains("disk"));
    }

    #[test]
    fn test_problem_serialization() {
        let problem = ApiError::InvalidParam {
            name: "limit",
            reason: "not a number".into(),
        }
        .problem();
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["title"], "Bad Request");
        assert_eq!(json["invalidParams"][0]["name"], "limit");

        let problem = ApiError::from(SchedulerError::MaxJobsReached(1)).problem();
        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("invalidParams").is_none());
    }
}
