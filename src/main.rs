use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wellness_api::config::{self, StorageBackend};
use wellness_api::handlers::{self, AppState};
use wellness_api::storage::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellness_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::config();
    tracing::info!(environment = ?cfg.environment, "starting wellness-api");

    let store: Arc<dyn Store> = match cfg.storage.backend {
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            store.seed_defaults().await?;
            tracing::warn!("using the in-memory store; data will not survive a restart");
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let url = std::env::var("DATABASE_URL")?;
            let store = PgStore::connect(&url, cfg.storage.max_connections).await?;
            store.migrate().await?;
            store.seed_defaults().await?;
            Arc::new(store)
        }
    };

    let app = handlers::app(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.server.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
