//! HTTP routes and handlers.

pub mod executions;
pub mod health;
pub mod jobs;
pub mod routes;
