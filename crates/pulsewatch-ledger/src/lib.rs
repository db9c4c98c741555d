//! # Pulsewatch Ledger
//!
//! Append-only store of probe executions and the criteria query engine used
//! to read it back.
//!
//! - [`ExecutionLedger`]: append + filtered, sorted, paginated retrieval
//! - [`SqliteLedger`]: durable SQLite implementation
//! - [`MemoryLedger`]: in-process implementation for tests and tooling
//! - [`ExecutionQueryService`]: applies paging defaults and validates
//!   filters before hitting the store

mod criteria;
mod error;
mod query;
mod record;
mod schema;
mod sqlite;
mod store;

pub use criteria::{
    ExecutionCriteria, FilterClause, Page, Pageable, Sort, SortDirection, SortProperty,
};
pub use error::LedgerError;
pub use query::{ExecutionFilter, ExecutionQueryService, PageRequest};
pub use record::{ExecutionRecord, ExecutionStatus, NewExecution};
pub use sqlite::SqliteLedger;
pub use store::{ExecutionLedger, MemoryLedger};
