//! Classified inbound envelope and the normalized outbound message.

use thiserror::Error;

use super::assistant::{AssistantEnvelope, AssistantPayload};
use super::messenger::{MessengerPayload, MessengerTextMessage};

/// The two platforms the relay sits between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Assistant,
    Messenger,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Assistant => "assistant",
            Platform::Messenger => "messenger",
        }
    }
}

/// Why an inbound request could not be attributed to either platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("signature header present but request body is empty")]
    MissingRawBody,
    #[error("signature matches neither the messenger nor the assistant secret")]
    BadSignature,
    #[error("unsigned request rejected in strict signature mode")]
    Unsigned,
    #[error("payload does not match the {expected} schema: {detail}")]
    MalformedPayload {
        expected: &'static str,
        detail: String,
    },
}

/// Result of origin classification; exactly one per request.
#[derive(Debug, Clone)]
pub enum InboundEnvelope {
    FromMessenger(MessengerPayload),
    FromAssistant(AssistantPayload),
    Unrecognized(Rejection),
}

impl InboundEnvelope {
    /// Short label for logs.
    pub fn origin(&self) -> &'static str {
        match self {
            InboundEnvelope::FromMessenger(_) => "messenger",
            InboundEnvelope::FromAssistant(_) => "assistant",
            InboundEnvelope::Unrecognized(_) => "unrecognized",
        }
    }
}

/// A single text to deliver on the destination platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: Platform,
    /// Phone number of the end user on both platforms
    pub destination_id: String,
    pub text: String,
}

impl OutboundMessage {
    pub fn to_assistant(destination_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            destination: Platform::Assistant,
            destination_id: destination_id.into(),
            text: text.into(),
        }
    }

    pub fn to_messenger(destination_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            destination: Platform::Messenger,
            destination_id: destination_id.into(),
            text: text.into(),
        }
    }

    /// Render as the assistant webhook envelope.
    pub fn assistant_envelope(&self) -> AssistantEnvelope {
        AssistantEnvelope::text(self.destination_id.clone(), self.text.clone())
    }

    /// Render as a Cloud API text message.
    pub fn messenger_message(&self) -> MessengerTextMessage {
        MessengerTextMessage::new(self.destination_id.clone(), self.text.clone())
    }
}
