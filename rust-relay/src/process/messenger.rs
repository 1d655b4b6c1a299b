//! WhatsApp → assistant translation.

use tracing::{info, warn};

use crate::wire::{MessengerPayload, OutboundMessage};

/// Translate every text message in a notification into an assistant envelope.
///
/// Non-text messages are skipped; status-only notifications yield nothing.
pub fn translate_messenger(payload: &MessengerPayload) -> Vec<OutboundMessage> {
    let mut outbound = Vec::new();

    for message in payload.messages() {
        let body = match (message.kind.as_str(), &message.text) {
            ("text", Some(text)) => &text.body,
            ("text", None) => {
                warn!(from = %message.from, "messenger_text_without_body");
                continue;
            }
            (kind, _) => {
                warn!(
                    from = %message.from,
                    message_type = kind,
                    "messenger_message_unsupported_type"
                );
                continue;
            }
        };

        info!(
            from = %message.from,
            message_id = ?message.id,
            sent_at = ?message.timestamp,
            text_length = body.len(),
            "messenger_message_received"
        );

        outbound.push(OutboundMessage::to_assistant(message.from.clone(), body.clone()));
    }

    if outbound.is_empty() {
        info!(object = ?payload.object, "messenger_payload_without_text");
    }

    outbound
}
