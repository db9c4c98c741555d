//! Execution history handler.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use pulsewatch_ledger::{
    ExecutionFilter, ExecutionRecord, ExecutionStatus, PageRequest, SortDirection, SortProperty,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw query parameters. Parsed by hand so each bad value is reported by name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionParams {
    pub job_name: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Zero-based page number.
    pub offset: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    pub sort_direction: Option<String>,
    /// Comma separated field names.
    pub sort_properties: Option<String>,
}

/// Paginated execution history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionListResponse {
    pub job_execution_list: Vec<ExecutionRecord>,
    pub total_pages: u64,
    pub total_elements: u64,
}

impl ExecutionParams {
    fn filter(&self) -> Result<ExecutionFilter, ApiError> {
        Ok(ExecutionFilter {
            job_name: present(&self.job_name).map(str::to_string),
            url: present(&self.url).map(str::to_string),
            status: present(&self.status)
                .map(ExecutionStatus::from_str)
                .transpose()?,
            from: present(&self.from)
                .map(|v| parse_timestamp("from", v))
                .transpose()?,
            to: present(&self.to)
                .map(|v| parse_timestamp("to", v))
                .transpose()?,
        })
    }

    fn page_request(&self) -> Result<PageRequest, ApiError> {
        let sort_properties = match present(&self.sort_properties) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(SortProperty::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(PageRequest {
            page_number: present(&self.offset)
                .map(|v| parse_number("offset", v))
                .transpose()?,
            page_size: present(&self.limit)
                .map(|v| parse_number("limit", v))
                .transpose()?,
            sort_direction: present(&self.sort_direction)
                .map(SortDirection::from_str)
                .transpose()?,
            sort_properties,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(name: &'static str, value: &str) -> Result<u32, ApiError> {
    value.parse().map_err(|_| ApiError::InvalidParam {
        name,
        reason: format!("'{}' is not a non-negative integer", value),
    })
}

/// RFC 3339, or a zone-less ISO date-time taken as UTC.
fn parse_timestamp(name: &'static str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::InvalidParam {
            name,
            reason: format!("'{}' is not an ISO-8601 date-time", value),
        })
}

/// Query the execution ledger.
///
/// GET /jobs/executions
pub async fn list_executions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ExecutionParams>, QueryRejection>,
) -> Result<Json<ExecutionListResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let filter = params.filter()?;
    let request = params.page_request()?;

    let page = state.executions.list_executions(filter, &request).await?;

    Ok(Json(ExecutionListResponse {
        job_execution_list: page.content,
        total_pages: page.total_pages,
        total_elements: page.total_elements,
    }))
}
