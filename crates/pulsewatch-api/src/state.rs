//! Shared handler state.

use std::sync::Arc;
use std::time::Instant;

use pulsewatch_ledger::ExecutionQueryService;
use pulsewatch_scheduler::JobScheduler;

/// State shared by every handler.
pub struct AppState {
    pub scheduler: Arc<JobScheduler>,
    pub executions: Arc<ExecutionQueryService>,
    /// Process start, for uptime reporting.
    pub started: Instant,
}

impl AppState {
    pub fn new(scheduler: Arc<JobScheduler>, executions: Arc<ExecutionQueryService>) -> Self {
        Self {
            scheduler,
            executions,
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
