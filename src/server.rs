//! Server initialization and startup logic for Pulsewatch.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pulsewatch_api::{ApiServer, AppState, ServerAddr};
use pulsewatch_config::{Config, ConfigValidator, LoggingConfig};
use pulsewatch_ledger::{ExecutionLedger, ExecutionQueryService, SqliteLedger};
use pulsewatch_monitor::UrlMonitor;
use pulsewatch_scheduler::{JobDefinition, JobScheduler};

/// Initialize tracing with console and file output.
///
/// Log files are written to `logging.dir` with daily rotation. `RUST_LOG`
/// takes precedence over `logging.level`.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = config.resolved_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pulsewatch")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the server in foreground until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Pulsewatch v{}", env!("CARGO_PKG_VERSION"));

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let ledger_path = config.ledger.resolved_path();
    let ledger: Arc<dyn ExecutionLedger> = Arc::new(SqliteLedger::open(&ledger_path).await?);
    info!("Execution ledger opened at {}", ledger_path.display());

    let monitor = Arc::new(UrlMonitor::new(ledger.clone(), &config.monitor)?);
    let scheduler = Arc::new(JobScheduler::new(&config.scheduler, monitor));
    info!(
        "Scheduler ready (max jobs: {}, max concurrent probes: {})",
        config.scheduler.max_jobs_allowed, config.scheduler.max_concurrent_executions
    );

    for job in &config.scheduler.jobs {
        if let Err(e) = scheduler.create_job(JobDefinition::from(job)) {
            error!("Failed to schedule configured job '{}': {}", job.name, e);
        }
    }

    let executions = Arc::new(ExecutionQueryService::new(
        ledger,
        config.ledger.max_page_size,
    ));
    let state = Arc::new(AppState::new(scheduler.clone(), executions));
    let server = ApiServer::new(ServerAddr::from(&config.server), state);

    info!("Pulsewatch ready at http://{}", server.addr());
    info!("  POST /jobs             - Register a job");
    info!("  GET  /jobs             - List jobs");
    info!("  GET  /jobs/executions  - Execution history");
    info!("  GET  /health           - Health check");

    let result = server.run(shutdown_signal()).await;

    info!("Shutting down...");
    scheduler.shutdown().await;
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
