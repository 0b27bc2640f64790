use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use ludik_directory::DirectoryClient;
use ludik_events::EventPublisher;
use ludik_jobs::{
    DirectorySyncJob, JobLauncher, JobScheduler, PgSubscriptionStore, SubscriptionExpiryJob,
};
use ludik_sync::{PgAssociationStore, ReconciliationEngine, SyncOrchestrator};

mod config;

use config::WorkerConfig;

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ludik_worker=debug")),
        )
        .init();

    // Load configuration
    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    tracing::info!(
        provider = %config.provider_name,
        areas = config.sync_areas.len(),
        page_size = config.sync_page_size,
        daily_at = %format!("{:02}:{:02}", config.daily_at.hour, config.daily_at.minute),
        "starting ludik worker"
    );

    // Create database pool
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Database connection error: {e}");
            std::process::exit(1);
        });

    // Directory client and reconciliation pipeline
    let client = DirectoryClient::new(config.provider_config()).unwrap_or_else(|e| {
        eprintln!("Provider client error: {e}");
        std::process::exit(1);
    });

    let (publisher, mut receiver) = EventPublisher::new(config.event_capacity);
    let engine = ReconciliationEngine::new(PgAssociationStore::new(pool.clone()));
    let orchestrator = Arc::new(
        SyncOrchestrator::new(client, engine, config.sync_page_size)
            .with_publisher(publisher.clone()),
    );

    // Batch jobs
    let sync_job = Arc::new(DirectorySyncJob::new(
        Arc::clone(&orchestrator),
        config.sync_areas.clone(),
        config.retry_policy(),
        config.sync_skip_limit,
    ));
    let expiry_job = Arc::new(
        SubscriptionExpiryJob::new(
            PgSubscriptionStore::new(pool.clone()),
            config.sync_page_size as usize,
        )
        .with_publisher(publisher.clone()),
    );

    // Drain the event bus into the log until outbound delivery lands
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_id = %event.event_id,
                        event_type = %event.event_type,
                        topic = %event.topic,
                        "event published"
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event log consumer lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let scheduler = JobScheduler::new(
        JobLauncher::new(),
        sync_job,
        expiry_job,
        config.daily_at,
    );

    tracing::info!("ludik worker scheduler running");
    scheduler.run().await;
}
