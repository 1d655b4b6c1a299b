//! Assistant → WhatsApp translation.

use tracing::{info, warn};

use crate::wire::{AssistantPayload, OutboundMessage};

/// Translate each text bubble of an assistant reply into one WhatsApp message.
///
/// Bubble order is preserved. Non-text bubbles are skipped without affecting
/// the rest of the batch.
pub fn translate_assistant(payload: &AssistantPayload) -> Vec<OutboundMessage> {
    let bubbles = payload.bubbles();

    info!(
        user_id = %payload.user_id,
        bubble_count = bubbles.len(),
        "assistant_reply_received"
    );

    bubbles
        .into_iter()
        .enumerate()
        .filter_map(|(index, bubble)| match (bubble.kind.as_str(), bubble.text) {
            ("text", Some(text)) => Some(OutboundMessage::to_messenger(
                payload.user_id.clone(),
                text,
            )),
            (kind, _) => {
                warn!(
                    user_id = %payload.user_id,
                    bubble_index = index,
                    bubble_type = kind,
                    "assistant_bubble_skipped"
                );
                None
            }
        })
        .collect()
}
