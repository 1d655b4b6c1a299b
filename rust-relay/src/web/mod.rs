//! Web server module for the relay endpoint.
//!
//! This module provides the HTTP surface that:
//! - Answers the Meta subscription handshake
//! - Identifies which platform signed an inbound POST
//! - Translates and forwards the message to the other platform
//! - Acknowledges the caller once every send has been attempted

pub mod handlers;
pub mod origin;
pub mod signature;


use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    check_subscription, health, receive_webhook, root, verify_subscription, AppState,
    HealthResponse, SubscriptionQuery, WebhookResponse,
};
pub use origin::{classify, OriginSecrets};
pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", get(verify_subscription).post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
