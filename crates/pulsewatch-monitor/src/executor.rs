//! Executor seam between triggers and the work they run.

use async_trait::async_trait;

/// Work bound to a job's trigger.
///
/// Implementations must not fail outward: every outcome is recorded by the
/// executor itself.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Run one execution for `job_name` against `url`.
    async fn run(&self, job_name: &str, url: &str);
}
