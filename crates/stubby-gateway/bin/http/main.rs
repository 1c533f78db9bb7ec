mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use stubby_cache::MokaResolutionCache;
use stubby_gateway::{App, AppState};
use stubby_shortener::{LinkService, ServiceConfig, Shortener};
use stubby_storage::{InMemoryLinkStore, SqliteLinkStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    stubby_telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        cache_capacity = config.cache_capacity,
        "starting stubby gateway"
    );

    let cache = match config.cache_ttl_secs {
        Some(secs) => MokaResolutionCache::with_ttl(config.cache_capacity, Duration::from_secs(secs)),
        None => MokaResolutionCache::with_capacity(config.cache_capacity),
    };
    let service_config = ServiceConfig::builder()
        .max_attempts(config.max_attempts)
        .reserved_codes(App::reserved_codes())
        .build();

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(
            LinkService::new(InMemoryLinkStore::new(), cache).with_config(service_config),
        ),
        StorageBackendArg::Sqlite => {
            let database_url = config
                .database_url
                .context("database url is required when storage backend is sqlite")?;
            let store = SqliteLinkStore::connect(&database_url)
                .await
                .with_context(|| format!("failed to open sqlite store at {database_url}"))?;
            Arc::new(LinkService::new(store, cache).with_config(service_config))
        }
    };

    let app = App::router(AppState::new(shortener, config.base_url));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
