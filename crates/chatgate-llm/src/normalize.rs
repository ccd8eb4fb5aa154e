//! Inbound request normalization.
//!
//! The gateway accepts loosely-typed bodies and never rejects one for its
//! shape: every field that is missing or has the wrong type is replaced by a
//! safe default. Malformed clients keep getting an answer instead of a 400,
//! so this layer must stay permissive.

use serde_json::Value;

use crate::{ChatMessage, ChatRole, GatewayRequest, DEFAULT_PROVIDER};

// ---------------------------------------------------------------------------
// InboundBody
// ---------------------------------------------------------------------------

/// A request body as the hosting layer hands it over.
#[derive(Debug, Clone)]
pub enum InboundBody {
    /// Already deserialized by the host.
    Json(Value),
    /// Raw bytes that still need decoding.
    Raw(Vec<u8>),
}

impl InboundBody {
    pub fn normalize(self) -> GatewayRequest {
        match self {
            InboundBody::Json(value) => normalize_value(&value),
            InboundBody::Raw(bytes) => normalize_bytes(&bytes),
        }
    }
}

impl From<Value> for InboundBody {
    fn from(value: Value) -> Self {
        InboundBody::Json(value)
    }
}

impl From<Vec<u8>> for InboundBody {
    fn from(bytes: Vec<u8>) -> Self {
        InboundBody::Raw(bytes)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Decode raw bytes as UTF-8 JSON. Undecodable or empty input is treated as `{}`.
pub fn normalize_bytes(bytes: &[u8]) -> GatewayRequest {
    if bytes.is_empty() {
        return GatewayRequest::default();
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => normalize_value(&value),
        Err(e) => {
            tracing::debug!(kind = "MALFORMED_BODY", error = %e, "Treating undecodable body as empty");
            GatewayRequest::default()
        }
    }
}

pub fn normalize_value(value: &Value) -> GatewayRequest {
    let provider = value["provider"]
        .as_str()
        .unwrap_or(DEFAULT_PROVIDER)
        .to_uppercase();

    let messages = value["messages"]
        .as_array()
        .map(|arr| arr.iter().filter_map(coerce_message).collect())
        .unwrap_or_default();

    let user_input = value["userInput"].as_str().unwrap_or("").to_string();

    GatewayRequest {
        provider,
        messages,
        user_input,
    }
}

/// Non-object entries are dropped; inside an object, an unknown role becomes
/// `user` and non-string content becomes empty.
fn coerce_message(entry: &Value) -> Option<ChatMessage> {
    if !entry.is_object() {
        return None;
    }
    let role = entry["role"]
        .as_str()
        .map(ChatRole::from_wire)
        .unwrap_or(ChatRole::User);
    let content = entry["content"].as_str().unwrap_or("").to_string();
    Some(ChatMessage { role, content })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
