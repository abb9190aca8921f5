//! Logical Permissions demo API server
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /v1/users`, `GET|PATCH /v1/users/:id` - Serializer-style users API
//! - `GET /v2/users`, `GET|PATCH /v2/users/:id` - Resource-style users API
//!
//! ## Configuration
//!
//! Environment variables:
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - HTTP server port (default: 8080)
//! - `RUST_LOG` - Log filter (default: info)
//! - `PERMISSIONS_DEFAULT_REGISTER_WITH_BACKEND`, `PERMISSION_DEFAULT_LABEL_FORMAT`,
//!   `PERMISSIONS_MODULE_NAME` - Permission settings

use logical_perms::PermsConfig;
use logical_perms_api::{build_router, ApiConfig, AppState, UserStore};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Logical Permissions API v{}", logical_perms::VERSION);

    let perms_config = PermsConfig::from_env();
    info!("Configuration:");
    info!("  Bind: {}", config.bind_address());
    info!("  Label format: {}", perms_config.label_format);
    info!("  Register by default: {}", perms_config.default_register);

    let state = AppState::new(UserStore::seeded(), perms_config)?;
    let app = build_router(state);

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}
