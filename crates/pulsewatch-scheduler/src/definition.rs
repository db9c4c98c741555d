//! Job definitions and registered jobs.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use serde::{Deserialize, Serialize};
use url::Url;

use pulsewatch_config::ScheduledJob;

use crate::error::SchedulerError;

/// A request to register a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    /// Unique job name, also the trigger identity.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Absolute http(s) URL probed on every firing.
    #[serde(default)]
    pub url: String,
    /// Cron expression, seconds first (6 or 7 fields).
    #[serde(default)]
    pub cron_expression: String,
    /// IANA timezone. `UTC` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl JobDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        cron_expression: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            cron_expression: cron_expression.into(),
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Check every field and resolve the schedule and timezone.
    pub(crate) fn validate(&self) -> Result<(Schedule, Tz), SchedulerError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("url", &self.url)?;
        require("cronExpression", &self.cron_expression)?;

        let url = Url::parse(self.url.trim())
            .map_err(|e| SchedulerError::invalid("url", format!("'{}' is not a valid URL: {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SchedulerError::invalid(
                "url",
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }

        let schedule = Schedule::from_str(self.cron_expression.trim()).map_err(|e| {
            SchedulerError::invalid(
                "cronExpression",
                format!("'{}' is not a valid cron expression: {}", self.cron_expression, e),
            )
        })?;

        let tz = match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Tz::UTC,
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| SchedulerError::invalid("timezone", format!("unknown timezone '{}'", name)))?,
        };

        Ok((schedule, tz))
    }
}

fn require(field: &'static str, value: &str) -> Result<(), SchedulerError> {
    if value.trim().is_empty() {
        return Err(SchedulerError::invalid(field, "must not be blank"));
    }
    Ok(())
}

impl From<&ScheduledJob> for JobDefinition {
    fn from(job: &ScheduledJob) -> Self {
        Self {
            name: job.name.clone(),
            description: job.description.clone(),
            url: job.url.clone(),
            cron_expression: job.cron_expression.clone(),
            timezone: job.timezone.clone(),
        }
    }
}

/// A job admitted to the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub name: String,
    pub description: String,
    pub url: String,
    pub cron_expression: String,
    /// Resolved IANA timezone name.
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    /// First tick after admission, if the schedule has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_fire_time: Option<DateTime<Utc>>,
}

impl Job {
    pub(crate) fn admitted(
        definition: JobDefinition,
        tz: Tz,
        next_fire_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: definition.name.trim().to_string(),
            description: definition.description,
            url: definition.url.trim().to_string(),
            cron_expression: definition.cron_expression.trim().to_string(),
            timezone: tz.name().to_string(),
            created_at: Utc::now(),
            next_fire_time,
        }
    }
}
