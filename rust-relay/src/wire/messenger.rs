//! WhatsApp Cloud API payloads.
//!
//! Inbound: the webhook notification Meta posts for every change on the
//! business account. Outbound: the text message body accepted by
//! `POST /{phone-number-id}/messages`.

use serde::{Deserialize, Serialize};

/// `messaging_product` value required on every outbound message.
pub const MESSAGING_PRODUCT: &str = "whatsapp";

// =============================================================================
// Inbound Notification
// =============================================================================

/// Webhook notification delivered by Meta.
///
/// Only `entry` is required; everything below it defaults to empty so that
/// status-only changes deserialize cleanly and yield no messages.
#[derive(Debug, Clone, Deserialize)]
pub struct MessengerPayload {
    #[serde(default)]
    pub object: Option<String>,
    pub entry: Vec<MessengerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessengerEntry {
    #[serde(default)]
    pub changes: Vec<MessengerChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessengerChange {
    #[serde(default)]
    pub value: MessengerChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessengerChangeValue {
    #[serde(default)]
    pub messages: Vec<MessengerMessage>,
}

/// A single user message inside a change.
#[derive(Debug, Clone, Deserialize)]
pub struct MessengerMessage {
    /// Sender phone number
    pub from: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Message type (`text`, `image`, `interactive`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<MessengerText>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessengerText {
    pub body: String,
}

impl MessengerPayload {
    /// Iterate every message across all entries and changes, in delivery order.
    pub fn messages(&self) -> impl Iterator<Item = &MessengerMessage> {
        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .flat_map(|change| change.value.messages.iter())
    }
}

// =============================================================================
// Outbound Message
// =============================================================================

/// Text message sent through the Cloud API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessengerTextMessage {
    pub messaging_product: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: MessengerText,
}

impl MessengerTextMessage {
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            messaging_product: MESSAGING_PRODUCT.to_string(),
            to: to.into(),
            kind: "text".to_string(),
            text: MessengerText { body: body.into() },
        }
    }
}
