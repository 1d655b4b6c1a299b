//! Configuration module for environment variable parsing.
//!
//! Every setting comes from the process environment. The platform credentials
//! are required, but a missing one does not abort startup: the binary reports
//! each gap through [`Config::missing_required`] and keeps serving.

use std::env;
use tracing::warn;

/// Default Graph API base used for outbound WhatsApp messages.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v23.0";

/// How strictly inbound POST signatures are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMode {
    /// Unsigned assistant-shaped bodies are accepted and every POST is acknowledged with 200.
    #[default]
    Lenient,
    /// Every accepted POST must carry a signature that verifies with one of the two secrets.
    Strict,
}

impl SignatureMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(SignatureMode::Lenient),
            "strict" => Some(SignatureMode::Strict),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Assistant (ODA) webhook URL that receives user messages
    pub assistant_webhook_url: Option<String>,

    /// Shared secret the assistant signs its callbacks with
    pub assistant_secret: Option<String>,

    /// Bearer token for the WhatsApp Cloud API
    pub messenger_api_token: Option<String>,

    /// WhatsApp sender phone-number id
    pub messenger_phone_number_id: Option<String>,

    /// WhatsApp app secret used for X-Hub-Signature-256
    pub messenger_app_secret: Option<String>,

    /// Token echoed back during the Meta subscription handshake
    pub verify_token: Option<String>,

    /// Graph API base URL (overridable for staging or tests)
    pub messenger_graph_url: String,

    /// Timeout applied to every outbound send, in milliseconds
    pub request_timeout_ms: u64,

    /// Signature enforcement on POST /webhook
    pub signature_mode: SignatureMode,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            assistant_webhook_url: non_empty("ODA_WEBHOOK_URL"),

            assistant_secret: non_empty("ODA_SECRET_KEY"),

            messenger_api_token: non_empty("WHATSAPP_API_TOKEN"),

            messenger_phone_number_id: non_empty("WHATSAPP_PHONE_NUMBER_ID"),

            messenger_app_secret: non_empty("WHATSAPP_APP_SECRET_KEY"),

            verify_token: non_empty("VERIFY_TOKEN"),

            messenger_graph_url: non_empty("WHATSAPP_GRAPH_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string()),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            signature_mode: parse_signature_mode("SIGNATURE_MODE"),
        }
    }

    /// Names of required environment variables that were absent or blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("ODA_WEBHOOK_URL", self.assistant_webhook_url.is_some()),
            ("ODA_SECRET_KEY", self.assistant_secret.is_some()),
            ("WHATSAPP_API_TOKEN", self.messenger_api_token.is_some()),
            ("WHATSAPP_PHONE_NUMBER_ID", self.messenger_phone_number_id.is_some()),
            ("WHATSAPP_APP_SECRET_KEY", self.messenger_app_secret.is_some()),
            ("VERIFY_TOKEN", self.verify_token.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_signature_mode(name: &str) -> SignatureMode {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return SignatureMode::default(),
    };

    match SignatureMode::parse(&raw) {
        Some(mode) => mode,
        None => {
            warn!(env_var = name, value = %raw, "Invalid signature mode, using default");
            SignatureMode::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_config() -> Config {
        Config {
            port: 3000,
            assistant_webhook_url: None,
            assistant_secret: None,
            messenger_api_token: None,
            messenger_phone_number_id: None,
            messenger_app_secret: None,
            verify_token: None,
            messenger_graph_url: DEFAULT_GRAPH_URL.to_string(),
            request_timeout_ms: 8000,
            signature_mode: SignatureMode::Lenient,
        }
    }

    #[test]
    fn test_non_empty_treats_blank_as_unset() {
        env::set_var("HUBRELAY_TEST_BLANK", "   ");
        assert_eq!(non_empty("HUBRELAY_TEST_BLANK"), None);
        env::remove_var("HUBRELAY_TEST_BLANK");

        env::set_var("HUBRELAY_TEST_SET", " value ");
        assert_eq!(non_empty("HUBRELAY_TEST_SET"), Some("value".to_string()));
        env::remove_var("HUBRELAY_TEST_SET");
    }

    #[test]
    fn test_signature_mode_parse() {
        assert_eq!(SignatureMode::parse("strict"), Some(SignatureMode::Strict));
        assert_eq!(SignatureMode::parse(" LENIENT "), Some(SignatureMode::Lenient));
        assert_eq!(SignatureMode::parse("paranoid"), None);
    }

    #[test]
    fn test_signature_mode_invalid_falls_back() {
        env::set_var("HUBRELAY_TEST_MODE", "sometimes");
        assert_eq!(parse_signature_mode("HUBRELAY_TEST_MODE"), SignatureMode::Lenient);
        env::remove_var("HUBRELAY_TEST_MODE");

        assert_eq!(parse_signature_mode("HUBRELAY_TEST_MODE_UNSET"), SignatureMode::Lenient);
    }

    #[test]
    fn test_missing_required_lists_every_gap() {
        let config = blank_config();
        assert_eq!(
            config.missing_required(),
            vec![
                "ODA_WEBHOOK_URL",
                "ODA_SECRET_KEY",
                "WHATSAPP_API_TOKEN",
                "WHATSAPP_PHONE_NUMBER_ID",
                "WHATSAPP_APP_SECRET_KEY",
                "VERIFY_TOKEN",
            ]
        );
    }

    #[test]
    fn test_missing_required_empty_when_complete() {
        let config = Config {
            assistant_webhook_url: Some("https://oda.example.com/hook".to_string()),
            assistant_secret: Some("oda".to_string()),
            messenger_api_token: Some("token".to_string()),
            messenger_phone_number_id: Some("1234".to_string()),
            messenger_app_secret: Some("app".to_string()),
            verify_token: Some("verify".to_string()),
            ..blank_config()
        };
        assert!(config.missing_required().is_empty());
    }
}
