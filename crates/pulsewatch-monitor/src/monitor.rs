//! URL monitor executor.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use pulsewatch_config::MonitorConfig;
use pulsewatch_ledger::{ExecutionLedger, NewExecution};

use crate::error::MonitorError;
use crate::executor::JobExecutor;

/// Probes a URL and records the outcome.
pub struct UrlMonitor {
    client: Client,
    ledger: Arc<dyn ExecutionLedger>,
}

impl UrlMonitor {
    /// Build a monitor writing to `ledger`.
    pub fn new(ledger: Arc<dyn ExecutionLedger>, config: &MonitorConfig) -> Result<Self, MonitorError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.probe_timeout_secs {
            if secs == 0 {
                return Err(MonitorError::InvalidConfig(
                    "probe_timeout_secs must be greater than 0".to_string(),
                ));
            }
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| MonitorError::ClientBuild(e.to_string()))?;

        Ok(Self { client, ledger })
    }

    /// One GET, body fully read. `Err` carries the short failure message.
    async fn probe(&self, url: &str) -> Result<StatusCode, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| short_error_message(&e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(status_message(status));
        }

        response
            .bytes()
            .await
            .map_err(|e| short_error_message(&e))?;

        Ok(status)
    }

    async fn execute(&self, job_name: &str, url: &str, trace_id: String) {
        let start = Instant::now();
        let outcome = self.probe(url).await;
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let execution = match outcome {
            Ok(status) => {
                debug!("Probe of {} answered {} in {}ms", url, status, elapsed);
                NewExecution::succeeded(job_name, url, elapsed)
            }
            Err(message) => {
                debug!("Probe of {} failed in {}ms: {}", url, elapsed, message);
                NewExecution::failed(job_name, url, elapsed, message)
            }
        }
        .with_trace_id(trace_id);

        if let Err(e) = self.ledger.append(execution).await {
            error!("Failed to record execution of job '{}': {}", job_name, e);
        }
    }
}

#[async_trait]
impl JobExecutor for UrlMonitor {
    async fn run(&self, job_name: &str, url: &str) {
        let trace_id = Uuid::new_v4().simple().to_string();
        let span = info_span!("execution", job = %job_name, trace_id = %trace_id);
        self.execute(job_name, url, trace_id).instrument(span).await;
    }
}

fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Single-line description of an error: the innermost cause, reduced to
/// the text after its last `:`.
pub fn short_error_message(err: &(dyn StdError + 'static)) -> String {
    let mut innermost = err;
    while let Some(source) = innermost.source() {
        innermost = source;
    }

    let text = innermost.to_string();
    let short = text.rsplit(':').next().unwrap_or_default().trim();
    let short = if short.is_empty() {
        err.to_string()
    } else {
        short.to_string()
    };

    match short.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => "Request failed".to_string(),
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
