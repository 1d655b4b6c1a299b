//! HubRelay Web Server - assistant ⇄ WhatsApp webhook relay.
//!
//! This binary:
//! - Answers the Meta subscription handshake on `GET /webhook`
//! - Receives callbacks from both platforms on `POST /webhook`
//! - Verifies which platform signed each request
//! - Forwards the translated message and acknowledges with 200

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hubrelay::{router, AppState, Config, Forwarder};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        assistant_webhook_configured = config.assistant_webhook_url.is_some(),
        assistant_secret_configured = config.assistant_secret.is_some(),
        messenger_token_configured = config.messenger_api_token.is_some(),
        messenger_phone_id_configured = config.messenger_phone_number_id.is_some(),
        messenger_secret_configured = config.messenger_app_secret.is_some(),
        verify_token_configured = config.verify_token.is_some(),
        graph_url = %config.messenger_graph_url,
        request_timeout_ms = config.request_timeout_ms,
        signature_mode = ?config.signature_mode,
        "config_loaded"
    );

    for name in config.missing_required() {
        warn!(env_var = name, "config_missing_required");
    }

    let forwarder = Forwarder::new(&config)?;
    let port = config.port;

    let app = router(AppState::new(config, forwarder));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
