/// Main application entry point
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use store_monitor::config::{AppConfig, SweepSettings};
use store_monitor::handlers::AppState;
use store_monitor::repo::{init_db, ObservationStore, PgObservationStore};
use store_monitor::routes::build_router;
use store_monitor::services::ReportService;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        reference = %config.report.reference_instant,
        default_timezone = %config.report.default_timezone,
        "Configuration loaded successfully"
    );

    // Initialize database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Database connection pool established");

    // Initialize database schema
    init_db(&pool).await?;
    info!("Database schema initialized");

    let store: Arc<dyn ObservationStore> = Arc::new(PgObservationStore::new(pool));
    let report_service = Arc::new(ReportService::new(store, config.report.clone()));

    start_sweeper(config.sweep.clone(), report_service.clone());

    let app = build_router(AppState { report_service });

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    info!("store_monitor listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Background task: expire registry entries and stale report artifacts
fn start_sweeper(sweep: SweepSettings, service: Arc<ReportService>) {
    tokio::spawn(async move {
        info!(
            "Starting report sweeper (interval: {}s)",
            sweep.every_seconds
        );
        loop {
            if let Err(e) = service.sweep(sweep.artifact_retention).await {
                error!("Report sweep error: {:?}", e);
            }
            tokio::time::sleep(Duration::from_secs(sweep.every_seconds)).await;
        }
    });
}
