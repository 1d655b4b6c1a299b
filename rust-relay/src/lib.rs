//! HubRelay - webhook relay between a digital assistant and WhatsApp.
//!
//! Both platforms call the same `/webhook` endpoint and sign their bodies
//! with `X-Hub-Signature-256`. The relay works out who signed each request,
//! translates the message into the other platform's schema and forwards it.
//!
//! ## Architecture
//!
//! ```text
//! POST /webhook → classify (origin) → translate → Forwarder → ODA | Graph API
//! ```

pub mod config;
pub mod forward;
pub mod process;
pub mod web;
pub mod wire;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, SignatureMode};
pub use forward::{ForwardSummary, Forwarder, SendError};
pub use process::translate;
pub use web::{classify, router, verify_signature, AppState};
pub use wire::{InboundEnvelope, OutboundMessage, Platform, Rejection};
