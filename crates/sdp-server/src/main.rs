//! SDP Server - Main entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sdp_common::logging::{init_logging, LogConfig};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::info;

use sdp_server::{
    config::Config,
    ingest::{queue::ReadingQueue, MessageIngestor},
    pipeline::PipelineCoordinator,
    store::PgReadingStore,
    transport::MqttSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::from_env()?.with_file_prefix("sdp-server");
    init_logging(&log_config)?;

    info!("Starting SDP Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - broker {}:{}, topic filter {:?}",
        config.transport.broker_host, config.transport.broker_port, config.transport.topic_filter
    );

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Database connection pool established");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    // Build the pipeline collaborators
    let queue = Arc::new(ReadingQueue::new());
    let store = Arc::new(PgReadingStore::new(db_pool));
    let ingestor = MessageIngestor::new(queue.clone());

    // Establish the transport subscription, then start the periodic loops
    let bridge = MqttSource::connect(&config.transport).spawn(ingestor);
    let coordinator = PipelineCoordinator::start(queue, store, &config.pipeline);

    // Run until an operator asks us to stop
    shutdown_signal().await;

    // Stop taking messages, then drain the pipeline tasks
    bridge.abort();
    coordinator.shutdown().await;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
