use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use ticketdesk_api::{app, AppState};
use ticketdesk_core::{BookingNumberGenerator, BookingRepository, BookingService, InMemoryBookingRepository};
use ticketdesk_store::app_config::{Config, StorageBackend};
use ticketdesk_store::{DbClient, PgBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ticketdesk_api=debug,ticketdesk_core=info,ticketdesk_store=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting ticketdesk API on port {}", config.server.port);

    let repo: Arc<dyn BookingRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(config.database()?)
                .await
                .context("Failed to connect to Postgres")?;
            // Schema must be current before the listener opens.
            db.migrate().await.context("Failed to run migrations")?;
            Arc::new(PgBookingRepository::new(db.pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory booking store; data is lost on restart");
            Arc::new(InMemoryBookingRepository::new())
        }
    };

    let service = BookingService::new(repo, BookingNumberGenerator::default())
        .with_insert_attempts(config.bookings.insert_attempts);

    let app = app(
        AppState::new(service),
        config.server.static_dir.as_deref().map(Path::new),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
