//! Wire types for both platforms.
//!
//! ## Flow
//!
//! ```text
//! raw body → InboundEnvelope → Vec<OutboundMessage> → platform JSON
//! ```

pub mod assistant;
pub mod envelope;
pub mod messenger;

pub use assistant::{AssistantBubble, AssistantEnvelope, AssistantPayload};
pub use envelope::{InboundEnvelope, OutboundMessage, Platform, Rejection};
pub use messenger::{MessengerMessage, MessengerPayload, MessengerTextMessage};
