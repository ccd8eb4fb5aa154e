//! Shared error taxonomy for the chatgate provider gateway.
//!
//! Every failure the gateway can produce maps to one [`GatewayError`] variant.
//! The variant decides the inbound HTTP status and the message the caller sees;
//! [`GatewayError::kind`] gives the stable taxonomy name used in logs.

/// Unified error type for the gateway, its providers, and the client wrapper.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // === Inbound Errors ===
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    BodyRejected { status: u16, message: String },

    /// The wire contract exposes only the fixed code, never the provider.
    #[error("API_KEY_MISSING")]
    CredentialsMissing { provider: String },

    // === Upstream Errors ===
    #[error("{provider} returned HTTP {status}: {message}")]
    UpstreamHttp {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Request to {provider} failed: {message}")]
    UpstreamTransport { provider: String, message: String },

    #[error("Request to {provider} timed out after {timeout_ms}ms")]
    UpstreamTimeout { provider: String, timeout_ms: u64 },

    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    // === Client Errors ===
    #[error("Gateway returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },
}

impl GatewayError {
    /// Stable taxonomy name, suitable for a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            GatewayError::CredentialsMissing { .. } => "CREDENTIALS_MISSING",
            GatewayError::UpstreamHttp { .. } => "UPSTREAM_HTTP_ERROR",
            GatewayError::UpstreamTransport { .. } => "UPSTREAM_TRANSPORT_ERROR",
            GatewayError::UpstreamTimeout { .. } => "UPSTREAM_TIMEOUT",
            GatewayError::MalformedResponse { .. } => "UPSTREAM_MALFORMED_RESPONSE",
            GatewayError::Remote { .. } => "REMOTE_ERROR",
            GatewayError::BodyRejected { .. } => "BODY_REJECTED",
        }
    }

    /// HTTP status the inbound caller receives for this error.
    ///
    /// Only inbound failures are distinguished; every other failure is a 500
    /// so callers never learn which upstream subtype went wrong.
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::MethodNotAllowed => 405,
            GatewayError::BodyRejected { status, .. } => *status,
            _ => 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
