//! # Fintrack Server
//!
//! Main entry point for the Fintrack backend. Boots the REST API, the
//! background worker pool, and the cron scheduler in a single process.

use fintrack_config::{AppConfig, ConfigLoader};
use fintrack_core::telemetry::init_telemetry;
use fintrack_core::{FintrackError, FintrackResult};
use fintrack_repository::create_pool;
use fintrack_rest::{create_router, AppState};
use fintrack_server::{bootstrap::Services, jobs::JobRuntime, startup};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Telemetry may not be initialized yet when startup fails.
        eprintln!("fintrack-server: {e}");
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> FintrackResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&config.telemetry)?;
    startup::print_banner();

    info!("Starting Fintrack Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    serve(config).await
}

async fn serve(config: AppConfig) -> FintrackResult<()> {
    let db_pool = create_pool(&config.database).await?;
    db_pool.run_migrations().await?;

    let redis_pool = if config.redis.enabled {
        let pool = fintrack_jobs::create_pool(&config.redis)
            .map_err(|e| FintrackError::Configuration(format!("Redis pool: {e}")))?;
        Some(pool)
    } else {
        info!("Redis disabled; caching and background jobs are off");
        None
    };

    let services = Services::build(&config, &db_pool, redis_pool.as_ref())?;
    let job_runtime = JobRuntime::build(&config, redis_pool.as_ref(), &services)?;

    let state = AppState {
        auth_service: services.auth.clone(),
        category_service: services.categories.clone(),
        transaction_service: services.transactions.clone(),
        budget_service: services.budgets.clone(),
        goal_service: services.goals.clone(),
        recurring_service: services.recurring.clone(),
        profile_service: services.profile.clone(),
        dashboard_service: services.dashboard.clone(),
        advisor_service: services.advisor.clone(),
        job_queue: job_runtime.as_ref().map(|rt| rt.queue.clone()),
        scheduler: job_runtime.as_ref().and_then(|rt| rt.scheduler.clone()),
    };

    let router = create_router(state, services.token_provider.clone(), &config.server);

    let job_handles = job_runtime
        .as_ref()
        .map(JobRuntime::start)
        .unwrap_or_default();

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FintrackError::Internal(format!("Failed to bind {addr}: {e}")))?;

    startup::print_startup_info(config.server.port);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FintrackError::Internal(format!("Server error: {e}")));

    if let Some(runtime) = &job_runtime {
        runtime.shutdown(job_handles).await;
    }
    db_pool.close().await;
    served?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
