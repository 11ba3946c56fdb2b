use clap::Parser;
use diceroom::{router, AppState, BroadcastRegistry, Config, InMemoryRoomRepository, TokenConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diceroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let host_prefix = config.normalized_host_prefix();

    info!(
        host_prefix = %host_prefix,
        queue_capacity = config.queue_capacity,
        "Starting dice room server"
    );

    // Composition root: every shared service is built here and handed down
    let broadcast_registry = BroadcastRegistry::new(config.queue_capacity);
    let app_state = AppState::new(
        Arc::new(InMemoryRoomRepository::new()),
        broadcast_registry.clone(),
        TokenConfig::new(&config.jwt_secret, config.session_expiration_days),
        host_prefix,
    );

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
    info!(address = %config.listen_address(), "Dice room is ready.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(broadcast_registry))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, after closing every open event stream
async fn shutdown_signal(broadcast_registry: BroadcastRegistry) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let closed = broadcast_registry.shutdown();
    info!(closed_streams = closed, "Shutdown signal received");
}
