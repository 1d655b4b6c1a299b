//! Forwarding of translated messages to the destination platform.
//!
//! ```text
//! OutboundMessage → Forwarder::send() → assistant webhook | Graph API /messages
//! ```

pub mod forwarder;

pub use forwarder::{ForwardSummary, Forwarder, SendError};
