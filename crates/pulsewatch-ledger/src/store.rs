//! Ledger store trait and the in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::criteria::{ExecutionCriteria, Page, Pageable};
use crate::error::LedgerError;
use crate::record::{ExecutionRecord, NewExecution};

/// Append-only execution ledger.
///
/// Records are never updated or deleted once appended.
#[async_trait]
pub trait ExecutionLedger: Send + Sync {
    /// Persist one execution, assigning its id, external id and timestamp.
    async fn append(&self, execution: NewExecution) -> Result<ExecutionRecord, LedgerError>;

    /// Number of records matching the criteria.
    async fn count(&self, criteria: &ExecutionCriteria) -> Result<u64, LedgerError>;

    /// One sorted page of records matching the criteria.
    async fn find(
        &self,
        criteria: &ExecutionCriteria,
        pageable: &Pageable,
    ) -> Result<Page<ExecutionRecord>, LedgerError>;
}

/// In-memory ledger for tests and tooling.
pub struct MemoryLedger {
    records: RwLock<Vec<ExecutionRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Every record in insertion order.
    pub async fn all(&self) -> Vec<ExecutionRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionLedger for MemoryLedger {
    async fn append(&self, execution: NewExecution) -> Result<ExecutionRecord, LedgerError> {
        let mut records = self.records.write().await;
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        let record = execution.into_record(id, Uuid::new_v4(), Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn count(&self, criteria: &ExecutionCriteria) -> Result<u64, LedgerError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| criteria.matches(r)).count() as u64)
    }

    async fn find(
        &self,
        criteria: &ExecutionCriteria,
        pageable: &Pageable,
    ) -> Result<Page<ExecutionRecord>, LedgerError> {
        let records = self.records.read().await;
        let mut matching: Vec<ExecutionRecord> = records
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect();
        drop(records);

        let total = matching.len() as u64;
        matching.sort_by(|a, b| pageable.sort.compare(a, b));

        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let content: Vec<ExecutionRecord> = matching
            .into_iter()
            .skip(offset)
            .take(pageable.page_size as usize)
            .collect();

        Ok(Page::new(content, pageable, total))
    }
}
