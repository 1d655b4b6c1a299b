//! Webhook endpoint handlers.
//!
//! One endpoint serves both platforms:
//! 1. `GET /webhook` answers the Meta subscription handshake
//! 2. `POST /webhook` classifies the caller, translates and forwards
//!
//! The raw body is extracted as `Bytes` per request so the signature is
//! always checked against exactly what this caller sent.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SignatureMode;
use crate::forward::Forwarder;
use crate::process::translate;
use crate::web::origin::{classify, OriginSecrets};
use crate::web::signature::SIGNATURE_HEADER;
use crate::wire::{InboundEnvelope, Rejection};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: Config, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            forwarder,
        }
    }

    fn origin_secrets(&self) -> OriginSecrets<'_> {
        OriginSecrets {
            messenger: self.config.messenger_app_secret.as_deref().unwrap_or_default(),
            assistant: self.config.assistant_secret.as_deref().unwrap_or_default(),
            mode: self.config.signature_mode,
        }
    }
}

// =============================================================================
// Liveness
// =============================================================================

/// Static liveness text.
pub async fn root() -> &'static str {
    "Webhook is running!"
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Subscription Handshake
// =============================================================================

/// Query parameters Meta sends when verifying the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Decide the handshake outcome.
///
/// * mode or token absent: 404
/// * mode is not `subscribe` or token differs: 403
/// * otherwise the challenge to echo back
pub fn check_subscription(
    query: &SubscriptionQuery,
    expected_token: Option<&str>,
) -> Result<String, StatusCode> {
    let (Some(mode), Some(token)) = (query.mode.as_deref(), query.verify_token.as_deref()) else {
        return Err(StatusCode::NOT_FOUND);
    };

    match expected_token {
        Some(expected) if mode == "subscribe" && token == expected => {
            Ok(query.challenge.clone().unwrap_or_default())
        }
        _ => Err(StatusCode::FORBIDDEN),
    }
}

/// Meta subscription handshake.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> impl IntoResponse {
    match check_subscription(&query, state.config.verify_token.as_deref()) {
        Ok(challenge) => {
            info!("webhook_subscription_verified");
            (StatusCode::OK, challenge)
        }
        Err(status) => {
            warn!(
                status_code = status.as_u16(),
                has_mode = query.mode.is_some(),
                has_token = query.verify_token.is_some(),
                "webhook_subscription_rejected"
            );
            (status, String::new())
        }
    }
}

// =============================================================================
// Message Delivery
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub origin: String,
    pub forwarded: usize,
    pub failed: usize,
}

impl WebhookResponse {
    fn rejected(status: &str) -> Self {
        Self {
            status: status.to_string(),
            origin: "unrecognized".to_string(),
            forwarded: 0,
            failed: 0,
        }
    }
}

/// Status code for a rejection when signatures are enforced.
///
/// Malformed but authenticated payloads are still acknowledged.
fn strict_rejection_status(reason: &Rejection) -> Option<StatusCode> {
    match reason {
        Rejection::MissingRawBody => Some(StatusCode::BAD_REQUEST),
        Rejection::BadSignature | Rejection::Unsigned => Some(StatusCode::UNAUTHORIZED),
        Rejection::MalformedPayload { .. } => None,
    }
}

/// Inbound delivery from either platform.
///
/// Replies 200 once every translated message has been attempted, including
/// when the request is dropped as unrecognized (lenient mode).
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    // A present but unreadable header must not fall through to the unsigned path.
    let signature = headers.get(SIGNATURE_HEADER).map(|v| {
        v.to_str().unwrap_or_else(|_| {
            warn!(header_length = v.len(), "webhook_signature_unreadable");
            ""
        })
    });

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "webhook_received"
    );

    let envelope = classify(&body, signature, &state.origin_secrets());

    if let InboundEnvelope::Unrecognized(reason) = &envelope {
        if state.config.signature_mode == SignatureMode::Strict {
            if let Some(status) = strict_rejection_status(reason) {
                warn!(
                    status_code = status.as_u16(),
                    reason = %reason,
                    "webhook_rejected"
                );
                let label = if status == StatusCode::BAD_REQUEST {
                    "bad_request"
                } else {
                    "unauthorized"
                };
                return (status, Json(WebhookResponse::rejected(label)));
            }
        }
    }

    let outbound = translate(&envelope);
    let summary = state.forwarder.forward_all(&outbound).await;

    let status = match &envelope {
        InboundEnvelope::Unrecognized(_) => "ignored",
        _ => "processed",
    };

    info!(
        origin = envelope.origin(),
        forwarded = summary.delivered,
        failed = summary.failed,
        "webhook_complete"
    );

    (
        StatusCode::OK,
        Json(WebhookResponse {
            status: status.to_string(),
            origin: envelope.origin().to_string(),
            forwarded: summary.delivered,
            failed: summary.failed,
        }),
    )
}
