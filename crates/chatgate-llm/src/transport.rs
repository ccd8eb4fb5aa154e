use std::fmt;

use async_trait::async_trait;

use chatgate_types::GatewayError;

// ---------------------------------------------------------------------------
// UpstreamCall / UpstreamReply
// ---------------------------------------------------------------------------

/// One fully-built outbound POST. Header and query values may carry
/// credentials, so `Debug` prints their names only.
#[derive(Clone)]
pub struct UpstreamCall {
    pub provider: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl fmt::Debug for UpstreamCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        let query_names: Vec<&str> = self.query.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("UpstreamCall")
            .field("provider", &self.provider)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("query", &query_names)
            .finish_non_exhaustive()
    }
}

/// Raw upstream answer; status interpretation is left to the provider adapter.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue exactly one POST. Only network-level failures are errors; any
    /// HTTP status, success or not, comes back as an `UpstreamReply`.
    async fn post_json(&self, call: UpstreamCall) -> Result<UpstreamReply, GatewayError>;
}

// ---------------------------------------------------------------------------
// ReqwestTransport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, call: UpstreamCall) -> Result<UpstreamReply, GatewayError> {
        let provider = call.provider;
        let mut builder = self
            .client
            .post(&call.url)
            .header("content-type", "application/json");
        for (name, value) in &call.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !call.query.is_empty() {
            builder = builder.query(&call.query);
        }

        let resp = builder
            .json(&call.body)
            .send()
            .await
            .map_err(|e| transport_error(provider, e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| transport_error(provider, e))?;

        Ok(UpstreamReply { status, body })
    }
}

fn transport_error(provider: &str, err: reqwest::Error) -> GatewayError {
    // reqwest embeds the full URL in its message; strip it so a query-string key never leaks.
    GatewayError::UpstreamTransport {
        provider: provider.into(),
        message: err.without_url().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
