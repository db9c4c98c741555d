//! Execution query service.
//!
//! Resolves paging defaults and validates caller input before handing a
//! criteria/pageable pair to the ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::criteria::{ExecutionCriteria, Page, Pageable, Sort, SortDirection, SortProperty};
use crate::error::LedgerError;
use crate::record::{ExecutionRecord, ExecutionStatus};
use crate::store::ExecutionLedger;

/// Caller-facing filter. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionFilter {
    pub job_name: Option<String>,
    pub url: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ExecutionFilter {
    fn validate(&self) -> Result<(), LedgerError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(LedgerError::InvalidDateRange);
            }
        }
        Ok(())
    }

    fn into_criteria(self) -> ExecutionCriteria {
        ExecutionCriteria {
            job_name: self.job_name,
            url: self.url,
            status: self.status,
            from: self.from,
            to: self.to,
        }
    }
}

/// Requested page. Unset fields fall back to service defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_direction: Option<SortDirection>,
    pub sort_properties: Vec<SortProperty>,
}

/// Read side of the ledger.
pub struct ExecutionQueryService {
    ledger: Arc<dyn ExecutionLedger>,
    max_page_size: u32,
}

impl ExecutionQueryService {
    pub fn new(ledger: Arc<dyn ExecutionLedger>, max_page_size: u32) -> Self {
        Self {
            ledger,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Resolve a page request against the defaults.
    ///
    /// The caller's sort only applies when at least one property is named;
    /// otherwise results are newest first.
    pub fn pageable(&self, request: &PageRequest) -> Result<Pageable, LedgerError> {
        let page_size = request.page_size.unwrap_or(self.max_page_size);
        if page_size == 0 || page_size > self.max_page_size {
            return Err(LedgerError::InvalidPageSize {
                requested: page_size,
                max: self.max_page_size,
            });
        }

        let sort = if request.sort_properties.is_empty() {
            Sort::default()
        } else {
            Sort::by(
                request.sort_direction.unwrap_or_default(),
                request.sort_properties.clone(),
            )
        };

        Ok(Pageable::new(
            request.page_number.unwrap_or(0),
            page_size,
            sort,
        ))
    }

    /// Filtered, sorted, paginated executions.
    pub async fn list_executions(
        &self,
        filter: ExecutionFilter,
        request: &PageRequest,
    ) -> Result<Page<ExecutionRecord>, LedgerError> {
        let pageable = self.pageable(request).inspect_err(|e| {
            warn!("Rejected execution query: {}", e);
        })?;
        filter.validate().inspect_err(|e| {
            warn!("Rejected execution query: {}", e);
        })?;

        let criteria = filter.into_criteria();
        debug!(
            "Listing executions: {} clauses, page {} size {}",
            criteria.clauses().len(),
            pageable.page_number,
            pageable.page_size
        );

        self.ledger.find(&criteria, &pageable).await
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
