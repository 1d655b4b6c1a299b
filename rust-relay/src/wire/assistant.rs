//! Digital assistant (ODA) webhook payloads.
//!
//! The assistant posts bot replies as `{ userId, messagePayload }` and expects
//! user messages in the same envelope shape.

use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound Reply
// =============================================================================

/// Bot reply delivered by the assistant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPayload {
    /// Destination phone number on the messenger side
    pub user_id: String,
    pub message_payload: AssistantMessagePayload,
}

/// Either a batch of bubbles under `body.messages`, or a single bubble inline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantMessagePayload {
    #[serde(default)]
    pub body: Option<AssistantBody>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantBody {
    #[serde(default)]
    pub messages: Vec<AssistantBubble>,
}

/// One discrete message unit within a reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssistantBubble {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl AssistantPayload {
    /// Bubbles of this reply in order.
    ///
    /// `body.messages` wins when present; otherwise an inline
    /// `messagePayload.type` is read as a single bubble.
    pub fn bubbles(&self) -> Vec<AssistantBubble> {
        let payload = &self.message_payload;

        if let Some(body) = &payload.body {
            return body.messages.clone();
        }

        match &payload.kind {
            Some(kind) => vec![AssistantBubble {
                kind: kind.clone(),
                text: payload.text.clone(),
            }],
            None => Vec::new(),
        }
    }
}

// =============================================================================
// Outbound Envelope
// =============================================================================

/// User message forwarded to the assistant webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantEnvelope {
    pub user_id: String,
    pub message_payload: AssistantTextPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantTextPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl AssistantEnvelope {
    pub fn text(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message_payload: AssistantTextPayload {
                kind: "text".to_string(),
                text: text.into(),
            },
        }
    }
}
