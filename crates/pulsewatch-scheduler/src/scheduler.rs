//! Job registry with locked admission.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pulsewatch_config::SchedulerConfig;
use pulsewatch_monitor::JobExecutor;

use crate::definition::{Job, JobDefinition};
use crate::error::SchedulerError;
use crate::trigger::{CronTrigger, next_fire_time};

struct RegisteredJob {
    job: Job,
    handle: Option<JoinHandle<()>>,
}

/// Registry of active jobs and owner of their triggers.
pub struct JobScheduler {
    max_jobs_allowed: usize,
    executor: Arc<dyn JobExecutor>,
    jobs: Mutex<HashMap<String, RegisteredJob>>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl JobScheduler {
    pub fn new(config: &SchedulerConfig, executor: Arc<dyn JobExecutor>) -> Self {
        Self {
            max_jobs_allowed: config.max_jobs_allowed,
            executor,
            jobs: Mutex::new(HashMap::new()),
            permits: Arc::new(Semaphore::new(config.max_concurrent_executions.max(1))),
            cancel: CancellationToken::new(),
        }
    }

    pub fn max_jobs_allowed(&self) -> usize {
        self.max_jobs_allowed
    }

    /// Validate and admit a job, then start its trigger.
    ///
    /// The capacity check, the name check and trigger registration happen
    /// under one lock, so concurrent callers can never push the registry past
    /// the limit or register a name twice. Must be called within a tokio
    /// runtime.
    pub fn create_job(&self, definition: JobDefinition) -> Result<Job, SchedulerError> {
        let (schedule, tz) = definition.validate().inspect_err(|e| {
            warn!("Rejected job '{}': {}", definition.name, e);
        })?;

        let mut jobs = self.jobs.lock();

        if self.cancel.is_cancelled() {
            return Err(SchedulerError::Stopped);
        }
        if jobs.len() >= self.max_jobs_allowed {
            warn!(
                "Rejected job '{}': limit of {} jobs reached",
                definition.name, self.max_jobs_allowed
            );
            return Err(SchedulerError::MaxJobsReached(self.max_jobs_allowed));
        }
        let name = definition.name.trim().to_string();
        if jobs.contains_key(&name) {
            warn!("Rejected job '{}': name already registered", name);
            return Err(SchedulerError::JobAlreadyExists(name));
        }

        let next = next_fire_time(&schedule, tz, Utc::now());
        let job = Job::admitted(definition, tz, next);

        let handle = CronTrigger::new(
            job.name.clone(),
            job.url.clone(),
            schedule,
            tz,
            self.executor.clone(),
            self.permits.clone(),
            self.cancel.child_token(),
        )
        .spawn();

        jobs.insert(
            name,
            RegisteredJob {
                job: job.clone(),
                handle: Some(handle),
            },
        );

        info!(
            "Scheduled job '{}' ({} {}) against {}",
            job.name, job.cron_expression, job.timezone, job.url
        );
        Ok(job)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.jobs.lock().contains_key(name)
    }

    /// Registered jobs ordered by name.
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.lock().values().map(|r| r.job.clone()).collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        jobs
    }

    /// Cancel every trigger and wait for the trigger tasks to exit.
    ///
    /// In-flight executions are dropped rather than awaited.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let handles: Vec<JoinHandle<()>> = self
            .jobs
            .lock()
            .values_mut()
            .filter_map(|r| r.handle.take())
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Trigger task ended abnormally: {}", e);
            }
        }
        info!("Scheduler stopped");
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
