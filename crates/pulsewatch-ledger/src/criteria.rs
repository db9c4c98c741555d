//! Criteria query engine.
//!
//! Optional filter fields are turned into a flat list of [`FilterClause`]s
//! combined with AND. Every clause knows both its SQL fragment and how to
//! evaluate itself against a record, so the SQLite and in-memory stores
//! share one predicate mapping.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::record::{ExecutionRecord, ExecutionStatus};

/// Optional filters over the ledger. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionCriteria {
    pub job_name: Option<String>,
    pub url: Option<String>,
    pub status: Option<ExecutionStatus>,
    /// Inclusive lower bound on `created_date`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_date`.
    pub to: Option<DateTime<Utc>>,
}

impl ExecutionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = Some(job_name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_status(mut self, status: ExecutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Build the AND-combined clause list.
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = Vec::new();

        if let Some(ref job_name) = self.job_name {
            clauses.push(FilterClause::JobName(job_name.clone()));
        }
        if let Some(ref url) = self.url {
            clauses.push(FilterClause::Url(url.clone()));
        }
        if let Some(status) = self.status {
            clauses.push(FilterClause::Status(status));
        }
        if let Some(from) = self.from {
            clauses.push(FilterClause::CreatedFrom(from));
        }
        if let Some(to) = self.to {
            clauses.push(FilterClause::CreatedTo(to));
        }

        clauses
    }

    /// Whether a record satisfies every clause.
    pub fn matches(&self, record: &ExecutionRecord) -> bool {
        self.clauses().iter().all(|c| c.matches(record))
    }
}

/// One filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    JobName(String),
    Url(String),
    Status(ExecutionStatus),
    CreatedFrom(DateTime<Utc>),
    CreatedTo(DateTime<Utc>),
}

impl FilterClause {
    /// SQL fragment with a single positional parameter.
    pub fn sql(&self) -> &'static str {
        match self {
            FilterClause::JobName(_) => "job_name = ?",
            FilterClause::Url(_) => "url = ?",
            FilterClause::Status(_) => "status = ?",
            FilterClause::CreatedFrom(_) => "created_date >= ?",
            FilterClause::CreatedTo(_) => "created_date <= ?",
        }
    }

    pub fn matches(&self, record: &ExecutionRecord) -> bool {
        match self {
            FilterClause::JobName(name) => record.job_name == *name,
            FilterClause::Url(url) => record.url == *url,
            FilterClause::Status(status) => record.status == *status,
            FilterClause::CreatedFrom(from) => record.created_date >= *from,
            FilterClause::CreatedTo(to) => record.created_date <= *to,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(LedgerError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Ledger fields a caller may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortProperty {
    Id,
    ExternalId,
    JobName,
    Url,
    Status,
    ResponseTime,
    ErrorMessage,
    CreatedDate,
    TraceId,
}

impl SortProperty {
    pub const ALL: [SortProperty; 9] = [
        SortProperty::Id,
        SortProperty::ExternalId,
        SortProperty::JobName,
        SortProperty::Url,
        SortProperty::Status,
        SortProperty::ResponseTime,
        SortProperty::ErrorMessage,
        SortProperty::CreatedDate,
        SortProperty::TraceId,
    ];

    /// Field name as exposed to API callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortProperty::Id => "id",
            SortProperty::ExternalId => "externalId",
            SortProperty::JobName => "jobName",
            SortProperty::Url => "url",
            SortProperty::Status => "status",
            SortProperty::ResponseTime => "responseTime",
            SortProperty::ErrorMessage => "errorMessage",
            SortProperty::CreatedDate => "createdDate",
            SortProperty::TraceId => "traceId",
        }
    }

    /// Backing column name.
    pub fn column(&self) -> &'static str {
        match self {
            SortProperty::Id => "id",
            SortProperty::ExternalId => "external_id",
            SortProperty::JobName => "job_name",
            SortProperty::Url => "url",
            SortProperty::Status => "status",
            SortProperty::ResponseTime => "response_time",
            SortProperty::ErrorMessage => "error_message",
            SortProperty::CreatedDate => "created_date",
            SortProperty::TraceId => "trace_id",
        }
    }

    /// Ascending comparison of two records on this field.
    pub fn compare(&self, a: &ExecutionRecord, b: &ExecutionRecord) -> Ordering {
        match self {
            SortProperty::Id => a.id.cmp(&b.id),
            // Byte order matches the lowercase hyphenated text stored in SQLite.
            SortProperty::ExternalId => a.external_id.cmp(&b.external_id),
            SortProperty::JobName => a.job_name.cmp(&b.job_name),
            SortProperty::Url => a.url.cmp(&b.url),
            SortProperty::Status => a.status.as_str().cmp(b.status.as_str()),
            SortProperty::ResponseTime => a.response_time.cmp(&b.response_time),
            SortProperty::ErrorMessage => a.error_message.cmp(&b.error_message),
            SortProperty::CreatedDate => a.created_date.cmp(&b.created_date),
            SortProperty::TraceId => a.trace_id.cmp(&b.trace_id),
        }
    }
}

impl fmt::Display for SortProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortProperty {
    type Err = LedgerError;

    /// Accepts the camelCase field name or the snake_case column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortProperty::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.column() == s)
            .ok_or_else(|| LedgerError::InvalidSortProperty(s.to_string()))
    }
}

/// Ordering applied to a query. All properties share one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub direction: SortDirection,
    pub properties: Vec<SortProperty>,
}

impl Sort {
    pub fn by(direction: SortDirection, properties: Vec<SortProperty>) -> Self {
        Self {
            direction,
            properties,
        }
    }

    /// Properties in application order, with `id` appended as the final
    /// tiebreaker so equal keys page deterministically.
    pub fn keys(&self) -> Vec<SortProperty> {
        let mut keys = self.properties.clone();
        if !keys.contains(&SortProperty::Id) {
            keys.push(SortProperty::Id);
        }
        keys
    }

    /// `ORDER BY` clause including the leading space.
    pub fn sql(&self) -> String {
        let dir = self.direction.as_sql();
        let cols: Vec<String> = self
            .keys()
            .iter()
            .map(|p| format!("{} {}", p.column(), dir))
            .collect();
        format!(" ORDER BY {}", cols.join(", "))
    }

    pub fn compare(&self, a: &ExecutionRecord, b: &ExecutionRecord) -> Ordering {
        self.keys()
            .iter()
            .map(|p| self.direction.apply(p.compare(a, b)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Self::by(SortDirection::Desc, vec![SortProperty::CreatedDate])
    }
}

/// A resolved page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Sort,
}

impl Pageable {
    pub fn new(page_number: u32, page_size: u32, sort: Sort) -> Self {
        Self {
            page_number,
            page_size,
            sort,
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

/// One page of results plus totals over the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// `total_pages` is never below 1, even for an empty result.
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let size = u64::from(pageable.page_size.max(1));
        let total_pages = total_elements.div_ceil(size).max(1);
        Self {
            content,
            page_number: pageable.page_number,
            page_size: pageable.page_size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;
