//! Payload translation between the two platforms.
//!
//! ## Processing Flow
//!
//! ```text
//! InboundEnvelope → translate() → Vec<OutboundMessage>
//! ```

pub mod assistant;
pub mod messenger;

use tracing::{info, warn};

use crate::wire::{InboundEnvelope, OutboundMessage};

pub use assistant::translate_assistant;
pub use messenger::translate_messenger;

/// Translate a classified envelope into the messages to forward.
///
/// Unrecognized envelopes translate to nothing.
pub fn translate(envelope: &InboundEnvelope) -> Vec<OutboundMessage> {
    let outbound = match envelope {
        InboundEnvelope::FromMessenger(payload) => {
            info!(origin = "messenger", "envelope_routing");
            translate_messenger(payload)
        }
        InboundEnvelope::FromAssistant(payload) => {
            info!(origin = "assistant", "envelope_routing");
            translate_assistant(payload)
        }
        InboundEnvelope::Unrecognized(reason) => {
            warn!(reason = %reason, "envelope_unrecognized_dropped");
            return Vec::new();
        }
    };

    info!(
        origin = envelope.origin(),
        outbound_count = outbound.len(),
        "envelope_translate_complete"
    );

    outbound
}
