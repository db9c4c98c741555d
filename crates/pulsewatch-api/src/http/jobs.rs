//! Job handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use tracing::info;

use pulsewatch_scheduler::{Job, JobDefinition};

use crate::error::ApiError;
use crate::state::AppState;

/// Response for listing jobs.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub count: usize,
    pub jobs: Vec<Job>,
}

/// Register a job.
///
/// POST /jobs
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    body: Result<Json<JobDefinition>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let Json(definition) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    info!(
        "Creating job: {} (schedule: {})",
        definition.name, definition.cron_expression
    );

    let job = state.scheduler.create_job(definition)?;
    Ok(Json(job))
}

/// List registered jobs.
///
/// GET /jobs
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<JobListResponse> {
    let jobs = state.scheduler.jobs();
    Json(JobListResponse {
        count: jobs.len(),
        jobs,
    })
}
