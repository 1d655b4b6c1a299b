//! `X-Hub-Signature-256` verification.
//!
//! Both platforms sign the raw request body with HMAC-SHA256 and send
//! `sha256=<hex digest>` in the same header. The digest must be computed over
//! the exact bytes received; re-serialized JSON will not match.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature from either platform.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the header value a sender holding `secret` would attach to `body`.
pub fn compute_signature(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a presented `sha256=<hex>` header against the raw body.
///
/// Returns `false` without hashing when the body, secret or header is empty.
pub fn verify_signature(secret: &str, body: &[u8], presented: &str) -> bool {
    if secret.is_empty() || body.is_empty() || presented.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            body_length = body.len(),
            has_signature = !presented.is_empty(),
            "signature_missing_fields"
        );
        return false;
    }

    let expected = match compute_signature(secret, body) {
        Some(sig) => sig,
        None => {
            warn!("signature_invalid_key");
            return false;
        }
    };

    constant_time_compare(&expected, presented)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
