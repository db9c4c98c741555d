//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert into an error carrying the first problem, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_scheduler(config, &mut result);
        Self::validate_monitor(config, &mut result);
        Self::validate_ledger(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_scheduler(config: &Config, result: &mut ValidationResult) {
        let scheduler = &config.scheduler;

        if scheduler.max_jobs_allowed == 0 {
            result.add_error(ValidationError::new(
                "scheduler.max_jobs_allowed",
                "max_jobs_allowed must be greater than 0",
            ));
        }

        if scheduler.max_concurrent_executions == 0 {
            result.add_error(ValidationError::new(
                "scheduler.max_concurrent_executions",
                "max_concurrent_executions must be greater than 0",
            ));
        }

        if scheduler.jobs.len() > scheduler.max_jobs_allowed {
            result.add_warning(ValidationWarning::new(
                "scheduler.jobs",
                format!(
                    "{} jobs declared but only {} can be registered",
                    scheduler.jobs.len(),
                    scheduler.max_jobs_allowed
                ),
            ));
        }

        for (i, job) in scheduler.jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("scheduler.jobs[{}].name", i),
                    "Job name cannot be blank",
                ));
            }
            if scheduler.jobs[..i].iter().any(|other| other.name == job.name) {
                result.add_warning(ValidationWarning::new(
                    format!("scheduler.jobs[{}].name", i),
                    format!("Duplicate job name '{}' will be rejected", job.name),
                ));
            }
        }
    }

    fn validate_monitor(config: &Config, result: &mut ValidationResult) {
        if config.monitor.probe_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "monitor.probe_timeout_secs",
                "probe_timeout_secs must be greater than 0 when set",
            ));
        }

        if config.monitor.probe_timeout_secs.is_none() {
            result.add_warning(ValidationWarning::new(
                "monitor.probe_timeout_secs",
                "No probe timeout set, a stalled endpoint can hold a probe slot indefinitely",
            ));
        }
    }

    fn validate_ledger(config: &Config, result: &mut ValidationResult) {
        if config.ledger.max_page_size == 0 {
            result.add_error(ValidationError::new(
                "ledger.max_page_size",
                "max_page_size must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
