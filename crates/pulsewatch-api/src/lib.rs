//! # Pulsewatch API
//!
//! HTTP adapter over the job scheduler and the execution ledger.
//!
//! ```text
//! POST /jobs             - Register a job
//! GET  /jobs             - List registered jobs
//! GET  /jobs/executions  - Filtered, paginated execution history
//! GET  /health           - Service health
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::{ApiError, InvalidParam, ProblemDetails};
pub use http::routes::create_router;
pub use server::{ApiServer, ServerAddr};
pub use state::AppState;
