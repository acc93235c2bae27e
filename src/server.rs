use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};

/// Pick the store for this configuration. Postgres when `DATABASE_URL` is
/// set (migrations are applied first), otherwise the in-memory store, which
/// `AppConfig::validate` only permits in development.
pub async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.database.url.as_deref() {
        Some(url) => {
            let pool = DatabaseManager::connect(&config.database, url).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Bind and serve until the process is stopped
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = build_store(&config).await?;
    let bind_addr = config.bind_addr();
    info!(
        "Starting SoundShare API in {:?} mode with {} store",
        config.environment,
        store.backend()
    );

    let router = app(AppState::new(config, store));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    info!("SoundShare API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
