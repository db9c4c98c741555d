//! Cron trigger: one tokio task per job, firing its executor on every tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pulsewatch_monitor::JobExecutor;

/// Next tick strictly after `after`, with the expression evaluated in `tz`.
pub fn next_fire_time(schedule: &Schedule, tz: Tz, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&after.with_timezone(&tz))
        .next()
        .map(|t| t.with_timezone(&Utc))
}

/// Recurring trigger bound to one job.
///
/// Firings of the same trigger never overlap: the next tick is computed only
/// after the previous execution returns, and ticks missed meanwhile are
/// skipped.
pub struct CronTrigger {
    job_name: String,
    url: String,
    schedule: Schedule,
    tz: Tz,
    executor: Arc<dyn JobExecutor>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl CronTrigger {
    pub fn new(
        job_name: impl Into<String>,
        url: impl Into<String>,
        schedule: Schedule,
        tz: Tz,
        executor: Arc<dyn JobExecutor>,
        permits: Arc<Semaphore>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            url: url.into(),
            schedule,
            tz,
            executor,
            permits,
            cancel,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Start the trigger loop on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut last_fired = Utc::now();

        loop {
            let after = last_fired.max(Utc::now());
            let Some(next) = next_fire_time(&self.schedule, self.tz, after) else {
                debug!("Trigger {} has no upcoming schedule", self.job_name);
                break;
            };

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            debug!(
                "Trigger {} scheduled for {}",
                self.job_name,
                next.to_rfc3339()
            );

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
            last_fired = next;

            let permit = tokio::select! {
                _ = self.cancel.cancelled() => break,
                permit = self.permits.clone().acquire_owned() => permit,
            };
            let Ok(_permit) = permit else {
                warn!("Execution permits closed, stopping trigger {}", self.job_name);
                break;
            };

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    warn!("Trigger {} cancelled during an execution", self.job_name);
                    break;
                }
                _ = self.executor.run(&self.job_name, &self.url) => {}
            }
        }

        debug!("Trigger {} stopped", self.job_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_next_fire_time_respects_timezone() {
        // 09:00 every day, Paris time. In January Paris is UTC+1.
        let schedule = Schedule::from_str("0 0 9 * * *").unwrap();
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        let next = next_fire_time(&schedule, tz, after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_next_fire_time_is_strictly_after() {
        let schedule = Schedule::from_str("0 * * * * *").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        let next = next_fire_time(&schedule, Tz::UTC, at).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 0).unwrap());
    }

    #[test]
    fn test_expired_schedule_has_no_fire_time() {
        let schedule = Schedule::from_str("0 0 0 1 1 * 2020").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(next_fire_time(&schedule, Tz::UTC, after).is_none());
    }
}
