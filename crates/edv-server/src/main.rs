//! EDV server entry point.
//!
//! Resolves configuration, opens the storage provider, re-registers existing
//! vaults, and serves the EDV routes with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use edv_server::config::{ServerConfig, StorageBackendType};
use edv_server::routes;
use edv_server::state::AppState;
use edv_storage::{MemoryProvider, StorageProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let host_url = config.host_url()?.to_owned();
    let backend = config.storage_backend()?;

    info!(storage = ?backend, "EDV starting");

    let provider = open_provider(&backend).await?;
    let state = Arc::new(AppState::new(provider));

    if config.no_restore {
        info!("vault restore disabled, starting with an empty registry");
    } else {
        let restored = state
            .vaults
            .restore()
            .await
            .context("failed to restore existing vaults")?;
        info!(
            restored,
            vaults = state.vaults.vault_count().await,
            "existing vaults registered"
        );
    }

    let app = routes::build_router(Arc::clone(&state), config.body_limit);

    let listener = TcpListener::bind(&host_url)
        .await
        .with_context(|| format!("failed to bind to {host_url}"))?;

    info!(host = %host_url, "Starting edv rest server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("EDV server stopped");
    Ok(())
}

/// Open the storage provider selected by the configuration.
async fn open_provider(backend: &StorageBackendType) -> anyhow::Result<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Arc::new(MemoryProvider::new())
        }
        #[cfg(feature = "rocksdb-backend")]
        StorageBackendType::RocksDb { path } => {
            info!(path = %path, "using RocksDB storage");
            Arc::new(
                edv_storage::RocksDbProvider::open(path)
                    .context("failed to open RocksDB storage")?,
            )
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        StorageBackendType::RocksDb { .. } => {
            anyhow::bail!("RocksDB backend requested but feature 'rocksdb-backend' is not enabled");
        }
        #[cfg(feature = "postgres-backend")]
        StorageBackendType::Postgres { url } => {
            info!("using PostgreSQL storage");
            Arc::new(
                edv_storage::PostgresProvider::connect(url)
                    .await
                    .context("failed to connect to PostgreSQL storage")?,
            )
        }
        #[cfg(not(feature = "postgres-backend"))]
        StorageBackendType::Postgres { .. } => {
            anyhow::bail!(
                "PostgreSQL backend requested but feature 'postgres-backend' is not enabled"
            );
        }
    };

    Ok(provider)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
