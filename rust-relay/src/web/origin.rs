//! Origin classification by trial verification.
//!
//! Both senders use `X-Hub-Signature-256`, so the header name says nothing
//! about who sent the request. The messenger secret is tried first, then the
//! assistant secret; the first one that verifies decides the origin and the
//! schema the body is parsed with.

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::SignatureMode;
use crate::web::signature::verify_signature;
use crate::wire::{InboundEnvelope, Rejection};

/// The secrets an inbound request is tried against.
#[derive(Debug, Clone, Copy)]
pub struct OriginSecrets<'a> {
    pub messenger: &'a str,
    pub assistant: &'a str,
    pub mode: SignatureMode,
}

/// Classify a raw request body into exactly one [`InboundEnvelope`] variant.
///
/// * no signature header: assistant if the body has the assistant shape
///   (lenient mode only), otherwise unrecognized
/// * messenger secret verifies: messenger
/// * assistant secret verifies: assistant
/// * anything else: unrecognized
///
/// A header that is present but blank still counts as signed and ends as
/// [`Rejection::BadSignature`]. Unconfigured (empty) secrets are not tried.
pub fn classify(
    body: &[u8],
    signature: Option<&str>,
    secrets: &OriginSecrets<'_>,
) -> InboundEnvelope {
    let Some(signature) = signature.map(str::trim) else {
        if secrets.mode == SignatureMode::Strict {
            warn!(body_length = body.len(), "origin_unsigned_rejected");
            return InboundEnvelope::Unrecognized(Rejection::Unsigned);
        }
        info!(body_length = body.len(), "origin_unsigned_assume_assistant");
        return parse_as(body, "assistant").map_or_else(
            InboundEnvelope::Unrecognized,
            InboundEnvelope::FromAssistant,
        );
    };

    if body.is_empty() {
        warn!("origin_signature_without_body");
        return InboundEnvelope::Unrecognized(Rejection::MissingRawBody);
    }

    if signature.is_empty() {
        warn!(body_length = body.len(), "origin_signature_blank");
        return InboundEnvelope::Unrecognized(Rejection::BadSignature);
    }

    if !secrets.messenger.is_empty() && verify_signature(secrets.messenger, body, signature) {
        info!(body_length = body.len(), "origin_verified_messenger");
        return parse_as(body, "messenger").map_or_else(
            InboundEnvelope::Unrecognized,
            InboundEnvelope::FromMessenger,
        );
    }

    if !secrets.assistant.is_empty() && verify_signature(secrets.assistant, body, signature) {
        info!(body_length = body.len(), "origin_verified_assistant");
        return parse_as(body, "assistant").map_or_else(
            InboundEnvelope::Unrecognized,
            InboundEnvelope::FromAssistant,
        );
    }

    warn!(
        body_length = body.len(),
        signature_length = signature.len(),
        "origin_signature_mismatch"
    );
    InboundEnvelope::Unrecognized(Rejection::BadSignature)
}

fn parse_as<T: DeserializeOwned>(body: &[u8], expected: &'static str) -> Result<T, Rejection> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(
            expected = expected,
            error = %e,
            body_preview = %String::from_utf8_lossy(&body[..body.len().min(200)]),
            "origin_payload_parse_failed"
        );
        Rejection::MalformedPayload {
            expected,
            detail: e.to_string(),
        }
    })
}
