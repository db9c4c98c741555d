//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::{executions, health, jobs};
use crate::state::AppState;

/// Create the application router.
///
/// ```text
/// /jobs
///   POST /jobs             - Register a job
///   GET  /jobs             - List registered jobs
///   GET  /jobs/executions  - Query the execution ledger
///
/// /health                  - Service health
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let job_routes = Router::new()
        .route("/", post(jobs::create_job))
        .route("/", get(jobs::list_jobs))
        .route("/executions", get(executions::list_executions));

    Router::new()
        .nest("/jobs", job_routes)
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
