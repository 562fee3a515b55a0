//! Todos server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todos::api::{cors_layer, create_router, AppState};
use todos::config::{AppConfig, LogFormat};
use todos::store::TodoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let store = TodoStore::connect(&config.database.url)
        .await
        .with_context(|| format!("failed to open store at {}", config.database.url))?;

    // Idempotent; the table must exist before the listener binds
    store
        .ensure_schema()
        .await
        .context("failed to ensure schema")?;
    tracing::info!("Schema ensured");

    let store = Arc::new(store);

    let cors = cors_layer(&config.cors.origin).context("invalid CORS configuration")?;
    let router = create_router(AppState::new(store.clone())).layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    store.close().await;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("todos=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
