//! Solve for Tomorrow API
//!
//! Administrative backend for advisors (`/orientadores`), participants
//! (`/participantes`) and projects (`/projetos`). Every resource exposes the
//! same five operations (list, get, create, update, delete) over JSON.

mod config;
mod db;
mod error;
mod models;
mod routes;
mod state;
mod store;
mod validation;

use crate::config::{Settings, StorageBackend};
use crate::db::PgStore;
use crate::routes::create_router;
use crate::state::AppState;
use crate::store::{MemoryStore, Store};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🚀 Starting Solve for Tomorrow API...");

    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    match settings.storage {
        StorageBackend::Postgres => {
            let store = PgStore::connect(&settings.database).await.map_err(|e| {
                error!("❌ FATAL: Failed to initialize database pool: {}", e);
                e
            })?;
            info!("✅ Database pool created successfully");

            if let Err(e) = store.migrate().await {
                warn!("⚠️  Warning creating tables: {}", e);
            }

            serve(store, &settings).await
        }
        StorageBackend::Memory => {
            warn!("⚠️  STORAGE_BACKEND=memory: records are lost on shutdown");
            serve(MemoryStore::new(), &settings).await
        }
    }
}

/// Bind the listener and run the router until a shutdown signal arrives
async fn serve<S: Store>(store: S, settings: &Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(store));
    let app = create_router(state, settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("   CORS origin: {}", settings.cors.allowed_origin);
    info!("📚 API Endpoints (for each of orientadores, participantes, projetos):");
    info!("   GET    /<resource>       - List all records");
    info!("   GET    /<resource>/{{id}}  - Get one record");
    info!("   POST   /<resource>       - Create a record");
    info!("   PUT    /<resource>/{{id}}  - Replace a record");
    info!("   DELETE /<resource>/{{id}}  - Delete a record");
    info!("   GET    /health           - Health check");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,solvefortomorrow_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
