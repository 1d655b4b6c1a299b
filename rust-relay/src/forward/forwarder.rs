//! Outbound delivery to the assistant webhook and the WhatsApp Cloud API.
//!
//! The forwarder owns one pooled `reqwest::Client` and can be cloned freely
//! across request handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::wire::{OutboundMessage, Platform};

/// Failure to deliver one outbound message.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("{0} destination is not configured")]
    NotConfigured(&'static str),

    #[error("request to {platform} failed: {source}")]
    Transport {
        platform: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{platform} responded with status {status}")]
    Remote {
        platform: &'static str,
        status: u16,
        body: String,
    },
}

impl SendError {
    /// What to log for this failure: the remote body when there is one.
    pub fn detail(&self) -> String {
        match self {
            SendError::Remote { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Outcome of forwarding a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardSummary {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// HTTP forwarder for both destination platforms.
#[derive(Clone)]
pub struct Forwarder {
    inner: Arc<ForwarderInner>,
}

struct ForwarderInner {
    client: Client,
    assistant_webhook_url: Option<String>,
    messenger_messages_url: Option<String>,
    messenger_api_token: Option<String>,
}

impl Forwarder {
    /// Build a forwarder from configuration.
    ///
    /// Every send is bounded by `request_timeout_ms`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_max_idle_per_host(16)
            .build()
            .context("Failed to create HTTP client")?;

        let messenger_messages_url = config.messenger_phone_number_id.as_ref().map(|id| {
            format!(
                "{}/{}/messages",
                config.messenger_graph_url.trim_end_matches('/'),
                id
            )
        });

        Ok(Self {
            inner: Arc::new(ForwarderInner {
                client,
                assistant_webhook_url: config.assistant_webhook_url.clone(),
                messenger_messages_url,
                messenger_api_token: config.messenger_api_token.clone(),
            }),
        })
    }

    /// Deliver one message to its destination platform.
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        match message.destination {
            Platform::Assistant => {
                let url = self
                    .inner
                    .assistant_webhook_url
                    .as_deref()
                    .ok_or(SendError::NotConfigured("assistant"))?;

                self.post(Platform::Assistant, url, None, &message.assistant_envelope())
                    .await
            }
            Platform::Messenger => {
                let url = self
                    .inner
                    .messenger_messages_url
                    .as_deref()
                    .ok_or(SendError::NotConfigured("messenger"))?;
                let token = self
                    .inner
                    .messenger_api_token
                    .as_deref()
                    .ok_or(SendError::NotConfigured("messenger"))?;

                self.post(
                    Platform::Messenger,
                    url,
                    Some(token),
                    &message.messenger_message(),
                )
                .await
            }
        }
    }

    /// Send every message in order, logging failures and continuing.
    ///
    /// Returns only after each message has been attempted.
    pub async fn forward_all(&self, messages: &[OutboundMessage]) -> ForwardSummary {
        let mut summary = ForwardSummary::default();

        for (index, message) in messages.iter().enumerate() {
            summary.attempted += 1;

            match self.send(message).await {
                Ok(()) => summary.delivered += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        destination = message.destination.as_str(),
                        destination_id = %message.destination_id,
                        message_index = index,
                        error = %e,
                        detail = %e.detail(),
                        "forward_send_failed"
                    );
                }
            }
        }

        info!(
            attempted = summary.attempted,
            delivered = summary.delivered,
            failed = summary.failed,
            "forward_batch_complete"
        );

        summary
    }

    async fn post<T: Serialize>(
        &self,
        platform: Platform,
        url: &str,
        bearer: Option<&str>,
        payload: &T,
    ) -> Result<(), SendError> {
        let platform_name = platform.as_str();

        let mut request = self.inner.client.post(url).json(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    warn!(platform = platform_name, error = %e, "forward_send_timeout");
                } else if e.is_connect() {
                    warn!(platform = platform_name, error = %e, "forward_send_connect_error");
                }
                return Err(SendError::Transport {
                    platform: platform_name,
                    source: e,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Remote {
                platform: platform_name,
                status: status.as_u16(),
                body,
            });
        }

        info!(
            platform = platform_name,
            status_code = status.as_u16(),
            "forward_send_complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_upstream, test_config};

    #[tokio::test]
    async fn test_send_to_messenger_uses_bearer_and_phone_id() {
        let upstream = spawn_upstream(|_| false).await;
        let forwarder = Forwarder::new(&test_config(&upstream.base_url)).unwrap();

        forwarder
            .send(&OutboundMessage::to_messenger("5511999999999", "hi"))
            .await
            .unwrap();

        let received = upstream.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].path, "/graph/PHONE123/messages");
        assert_eq!(received[0].authorization.as_deref(), Some("Bearer wa-token"));
        assert_eq!(
            received[0].body,
            serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "5511999999999",
                "type": "text",
                "text": {"body": "hi"}
            })
        );
    }

    #[tokio::test]
    async fn test_send_to_assistant_is_unauthenticated() {
        let upstream = spawn_upstream(|_| false).await;
        let forwarder = Forwarder::new(&test_config(&upstream.base_url)).unwrap();

        forwarder
            .send(&OutboundMessage::to_assistant("5511", "olá"))
            .await
            .unwrap();

        let received = upstream.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].path, "/oda/hook");
        assert!(received[0].authorization.is_none());
        assert_eq!(
            received[0].body,
            serde_json::json!({
                "userId": "5511",
                "messagePayload": {"type": "text", "text": "olá"}
            })
        );
    }

    #[tokio::test]
    async fn test_remote_error_carries_body() {
        let upstream = spawn_upstream(|_| true).await;
        let forwarder = Forwarder::new(&test_config(&upstream.base_url)).unwrap();

        let err = forwarder
            .send(&OutboundMessage::to_messenger("1", "x"))
            .await
            .unwrap_err();

        match &err {
            SendError::Remote { status, body, .. } => {
                assert_eq!(*status, 500);
                assert!(body.contains("upstream refused"));
            }
            other => panic!("Expected Remote error, got {:?}", other),
        }
        assert!(err.detail().contains("upstream refused"));
    }

    #[tokio::test]
    async fn test_forward_all_continues_after_failure() {
        let upstream = spawn_upstream(|body| body["text"]["body"] == "hi").await;
        let forwarder = Forwarder::new(&test_config(&upstream.base_url)).unwrap();

        let summary = forwarder
            .forward_all(&[
                OutboundMessage::to_messenger("1", "hi"),
                OutboundMessage::to_messenger("1", "there"),
            ])
            .await;

        assert_eq!(
            summary,
            ForwardSummary {
                attempted: 2,
                delivered: 1,
                failed: 1
            }
        );
        assert_eq!(upstream.received().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_is_reported() {
        let mut config = test_config("http://127.0.0.1:1");
        config.request_timeout_ms = 500;
        let forwarder = Forwarder::new(&config).unwrap();

        let err = forwarder
            .send(&OutboundMessage::to_assistant("1", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Transport { platform: "assistant", .. }));
    }

    #[tokio::test]
    async fn test_missing_destination_is_not_configured() {
        let mut config = test_config("http://127.0.0.1:1");
        config.assistant_webhook_url = None;
        config.messenger_phone_number_id = None;
        let forwarder = Forwarder::new(&config).unwrap();

        let to_oda = forwarder.send(&OutboundMessage::to_assistant("1", "x")).await;
        let to_wa = forwarder.send(&OutboundMessage::to_messenger("1", "x")).await;

        assert!(matches!(to_oda, Err(SendError::NotConfigured("assistant"))));
        assert!(matches!(to_wa, Err(SendError::NotConfigured("messenger"))));
    }

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let mut config = test_config("http://localhost");
        config.messenger_graph_url = "https://graph.facebook.com/v23.0/".to_string();
        let forwarder = Forwarder::new(&config).unwrap();

        assert_eq!(
            forwarder.inner.messenger_messages_url.as_deref(),
            Some("https://graph.facebook.com/v23.0/PHONE123/messages")
        );
    }
}
