//! Ledger error types.

use thiserror::Error;

/// Ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store could not be opened.
    #[error("Failed to open ledger: {0}")]
    Connection(String),

    /// A statement against the backing store failed.
    #[error("Ledger query failed: {0}")]
    Query(String),

    /// Unknown execution status.
    #[error("Invalid status value '{0}'. Please provide one of [SUCCEEDED, FAILED]")]
    InvalidStatus(String),

    /// Unknown sort direction.
    #[error("Invalid sort direction value '{0}'. Please provide one of [ASC, DESC]")]
    InvalidSortDirection(String),

    /// Sort property that does not name a ledger field.
    #[error("Invalid sort property '{0}'")]
    InvalidSortProperty(String),

    /// Page size outside `1..=max`.
    #[error("page size must be between 1 and {max}, got {requested}")]
    InvalidPageSize { requested: u32, max: u32 },

    /// `from` is after `to`.
    #[error("Invalid date range. From must be before to and to must be after from")]
    InvalidDateRange,
}

impl LedgerError {
    /// Whether the error was caused by caller input rather than the store.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, LedgerError::Connection(_) | LedgerError::Query(_))
    }

    /// Name of the request parameter at fault, if any.
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            LedgerError::InvalidStatus(_) => Some("status"),
            LedgerError::InvalidSortDirection(_) => Some("sortDirection"),
            LedgerError::InvalidSortProperty(_) => Some("sortProperties"),
            LedgerError::InvalidPageSize { .. } => Some("limit"),
            LedgerError::InvalidDateRange => Some("from"),
            LedgerError::Connection(_) | LedgerError::Query(_) => None,
        }
    }
}

impl From<tokio_rusqlite::Error> for LedgerError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        LedgerError::Query(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_flagged() {
        assert!(LedgerError::InvalidDateRange.is_invalid_input());
        assert!(LedgerError::InvalidStatus("x".into()).is_invalid_input());
        assert!(!LedgerError::Query("disk I/O error".into()).is_invalid_input());
    }

    #[test]
    fn test_param_names() {
        let err = LedgerError::InvalidPageSize {
            requested: 500,
            max: 100,
        };
        assert_eq!(err.param_name(), Some("limit"));
        assert!(err.to_string().contains("100"));
        assert_eq!(LedgerError::Connection("x".into()).param_name(), None);
    }

    #[test]
    fn test_status_message_lists_values() {
        let err = LedgerError::InvalidStatus("RUNNING".into());
        assert!(err.to_string().contains("SUCCEEDED, FAILED"));
    }
}
