use chatgate_types::GatewayError;

use crate::{Credential, GatewayRequest, UpstreamCall};

// ---------------------------------------------------------------------------
// ProviderAdapter
// ---------------------------------------------------------------------------

/// Translation between the gateway contract and one upstream's wire shape.
///
/// Adapters are pure: they never touch the network, so the same request and
/// credential always yield the same call.
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Build the single outbound call for `request`.
    fn build_call(&self, request: &GatewayRequest, credential: &Credential) -> UpstreamCall;

    /// Pull the reply text out of a successful response body. Missing fields
    /// at any nesting level yield an empty string.
    fn extract_text(&self, body: &serde_json::Value) -> String;

    fn map_error(&self, status: u16, body: &str) -> GatewayError {
        GatewayError::UpstreamHttp {
            provider: self.name().into(),
            status,
            message: extract_error_message(body),
        }
    }
}

/// Both upstreams report failures as `{"error": {"message": ...}}`; fall back
/// to the raw body otherwise.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
