//! # Pulsewatch Scheduler
//!
//! Volatile registry of cron-scheduled URL checks. Admission (capacity and
//! name uniqueness) happens under a single lock; each admitted job gets one
//! trigger task that fires its executor on every cron tick.

mod definition;
mod error;
mod scheduler;
mod trigger;

pub use definition::{Job, JobDefinition};
pub use error::SchedulerError;
pub use scheduler::JobScheduler;
pub use trigger::{CronTrigger, next_fire_time};
