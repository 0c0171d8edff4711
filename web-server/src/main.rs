//! Sleep Disorder Risk - server entry point

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use sleeprisk_core::ClassificationService;
use sleeprisk_server::config::{Config, LogFormat};
use sleeprisk_server::{create_router, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sleeprisk_server=debug,sleeprisk_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Make sure the parent directory of a file-backed SQLite URL exists
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or(rest);
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(config.log_format);

    tracing::info!("Sleep Risk Server starting...");
    for name in config.insecure_defaults() {
        if config.is_production() {
            tracing::error!("{} is not set; using an insecure development default", name);
        } else {
            tracing::warn!("{} not set, using development default", name);
        }
    }

    // Load model artifacts; a failure leaves the service unavailable, not down
    let classifier = ClassificationService::load(&config.model_dir);

    // Initialize database pool
    ensure_sqlite_dir(&config.database_url).context("Failed to create database directory")?;
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let state = AppState {
        pool,
        config: config.clone(),
        classifier,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
