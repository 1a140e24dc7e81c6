use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{error, info};

use campus_api::{build_router, security::AdminGate, AppState};
use campus_core::repositories::DocumentStore;
use campus_core::services::{AuditLogger, TracingAuditLogger};
use campus_infrastructure::{
    create_pool, run_migrations, AuditQueueConfig, AuditWorkers, MemoryStore, PgAuditLogger,
    PgDocumentStore,
};
use campus_shared::config::{AppConfig, AuditSink, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env first)
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry
    campus_shared::telemetry::init_telemetry("info", config.app.log_json)?;

    info!("{} starting ({})", config.app.name, config.app.env);

    let (state, audit_workers) = build_state(&config).await?;
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(workers) = audit_workers {
        workers.shutdown().await;
    }

    info!("Server stopped");
    Ok(())
}

/// Wire store, audit sink and admin gate from configuration. Database audit
/// workers are returned so they can be drained on shutdown.
async fn build_state(config: &AppConfig) -> anyhow::Result<(AppState, Option<AuditWorkers>)> {
    let pool = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory document store");
            None
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("storage.backend = \"postgres\" requires database.url")?;

            info!("Connecting to database...");
            let pool = create_pool(
                url,
                config.database.max_connections,
                config.database.acquire_timeout_secs,
            )
            .await?;
            run_migrations(&pool).await?;
            info!("Database connection established.");
            Some(pool)
        }
    };

    let store: Arc<dyn DocumentStore> = match &pool {
        Some(pool) => Arc::new(PgDocumentStore::new(pool.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    let (audit, audit_workers) = match (config.audit.sink, &pool) {
        (AuditSink::Tracing, _) => {
            let audit: Arc<dyn AuditLogger> = Arc::new(TracingAuditLogger);
            (audit, None)
        }
        (AuditSink::Database, Some(pool)) => {
            let (logger, workers) = PgAuditLogger::new(
                pool.clone(),
                AuditQueueConfig {
                    queue_capacity: config.audit.queue_capacity,
                    batch_size: config.audit.batch_size,
                    batch_timeout_ms: config.audit.batch_timeout_ms,
                    worker_count: config.audit.worker_count,
                },
            );
            let audit: Arc<dyn AuditLogger> = Arc::new(logger);
            (audit, Some(workers))
        }
        (AuditSink::Database, None) => {
            bail!("audit.sink = \"database\" requires storage.backend = \"postgres\"")
        }
    };

    let gate = AdminGate::from_settings(&config.auth)?;
    if !gate.is_enabled() {
        info!("Admin gate disabled: mutating routes are open");
    }

    Ok((AppState::new(store, audit, gate), audit_workers))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
