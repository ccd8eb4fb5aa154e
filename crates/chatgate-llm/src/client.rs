use std::time::Duration;

use chatgate_types::GatewayError;

use crate::{ChatMessage, GatewayRequest};

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8787";

/// Longer than the gateway's own upstream timeout, so a slow upstream surfaces
/// as the gateway's 500 timeout reply rather than a client-side abort.
pub const DEFAULT_CLIENT_TIMEOUT_MS: u64 = crate::config::DEFAULT_TIMEOUT_MS + 5_000;

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// Typed client for a running gateway's `POST /api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(DEFAULT_CLIENT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Send one prompt with its prior turns and return the reply text.
    pub async fn ask(
        &self,
        provider: &str,
        history: Vec<ChatMessage>,
        user_input: &str,
    ) -> Result<String, GatewayError> {
        let request = GatewayRequest::new(provider, user_input).with_messages(history);
        self.send(&request).await
    }

    pub async fn send(&self, request: &GatewayRequest) -> Result<String, GatewayError> {
        let resp = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamTransport {
                provider: "gateway".into(),
                message: e.to_string(),
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| GatewayError::UpstreamTransport {
            provider: "gateway".into(),
            message: e.to_string(),
        })?;

        parse_reply(status, &body)
    }
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}

/// Map the gateway's `{text}` / `{error}` contract back into a `Result`.
fn parse_reply(status: u16, body: &str) -> Result<String, GatewayError> {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        let json = json.ok_or_else(|| GatewayError::MalformedResponse {
            provider: "gateway".into(),
            message: "Response body is not JSON".into(),
        })?;
        return Ok(json["text"].as_str().unwrap_or("").to_string());
    }

    let message = json
        .as_ref()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string());
    Err(GatewayError::Remote { status, message })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
