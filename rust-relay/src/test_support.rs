//! Shared fixtures for unit and router tests.

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;

use crate::config::{Config, SignatureMode};

pub const MESSENGER_SECRET: &str = "wa-app-secret";
pub const ASSISTANT_SECRET: &str = "oda-secret";
pub const VERIFY_TOKEN: &str = "verify-me";

/// One request captured by the fake upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct UpstreamState {
    received: Arc<Mutex<Vec<Recorded>>>,
    fail_when: fn(&serde_json::Value) -> bool,
}

/// Fake assistant webhook + Graph API listening on an ephemeral port.
pub struct MockUpstream {
    pub base_url: String,
    received: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn received(&self) -> Vec<Recorded> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a fake upstream that records every request and answers 500 for
/// bodies matching `fail_when`, 200 otherwise.
pub async fn spawn_upstream(fail_when: fn(&serde_json::Value) -> bool) -> MockUpstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = UpstreamState {
        received: received.clone(),
        fail_when,
    };

    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}", addr),
        received,
    }
}

async fn record(
    State(state): State<UpstreamState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
    let fail = (state.fail_when)(&body);

    state.received.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if fail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"message":"upstream refused"}}"#.to_string(),
        )
    } else {
        (StatusCode::OK, r#"{"ok":true}"#.to_string())
    }
}

/// Fully populated configuration pointing both destinations at `base_url`.
pub fn test_config(base_url: &str) -> Config {
    Config {
        port: 0,
        assistant_webhook_url: Some(format!("{}/oda/hook", base_url)),
        assistant_secret: Some(ASSISTANT_SECRET.to_string()),
        messenger_api_token: Some("wa-token".to_string()),
        messenger_phone_number_id: Some("PHONE123".to_string()),
        messenger_app_secret: Some(MESSENGER_SECRET.to_string()),
        verify_token: Some(VERIFY_TOKEN.to_string()),
        messenger_graph_url: format!("{}/graph", base_url),
        request_timeout_ms: 2000,
        signature_mode: SignatureMode::Lenient,
    }
}
