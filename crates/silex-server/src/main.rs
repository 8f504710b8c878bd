//! Silex server entry point.
//!
//! Bootstraps the review repository, admin gate, and lead notifier, then
//! starts the Axum HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use silex_core::admin::AdminGate;
use silex_core::lead::{LogNotifier, Notifier};
use silex_core::store::ReviewStore;
use silex_storage::{MemoryRepository, ReviewRepository};

use silex_server::app::build_router;
use silex_server::config::{ServerConfig, StorageBackendType};
use silex_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(storage = ?config.storage_backend, "Silex starting");

    let state = build_app_state(&config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Silex server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Silex server stopped");
    Ok(())
}

/// Build the shared application state from configuration.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let repo: Arc<dyn ReviewRepository> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (reviews will not persist)");
            Arc::new(MemoryRepository::new())
        }
        #[cfg(feature = "redb-backend")]
        StorageBackendType::Redb { path } => {
            info!(path = %path, "using redb storage");
            Arc::new(
                silex_storage::RedbRepository::open(path)
                    .context("failed to open redb storage")?,
            )
        }
        #[cfg(not(feature = "redb-backend"))]
        StorageBackendType::Redb { .. } => {
            anyhow::bail!("redb backend requested but feature 'redb-backend' is not enabled");
        }
        #[cfg(feature = "postgres-backend")]
        StorageBackendType::Postgres { url } => {
            info!(url = %"[redacted]", "using PostgreSQL storage");
            Arc::new(
                silex_storage::PostgresRepository::connect(url)
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

    let gate = AdminGate::new(config.admin_password.as_deref());
    if !gate.is_configured() {
        warn!("ADMIN_PASSWORD is not set, admin routes will reject every request");
    }

    let notifier = build_notifier(config)?;

    Ok(Arc::new(AppState {
        store: ReviewStore::new(repo),
        gate,
        notifier,
        public_limit: config.public_limit,
    }))
}

#[cfg(feature = "webhook")]
fn build_notifier(config: &ServerConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match &config.lead_webhook_url {
        Some(url) => {
            info!("lead notifications go to the configured webhook");
            Ok(Arc::new(
                silex_server::notify::WebhookNotifier::new(url.as_str())
                    .context("failed to build lead webhook notifier")?,
            ))
        }
        None => {
            info!("no lead webhook configured, leads are logged only");
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[cfg(not(feature = "webhook"))]
fn build_notifier(config: &ServerConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    if config.lead_webhook_url.is_some() {
        warn!("SILEX_LEAD_WEBHOOK_URL is set but feature 'webhook' is not enabled");
    }
    Ok(Arc::new(LogNotifier))
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
