use serde_json::json;

use crate::{
    ChatMessage, ChatRole, Credential, GatewayConfig, GatewayRequest, ProviderAdapter,
    UpstreamCall,
};

// ---------------------------------------------------------------------------
// GeminiAdapter
// ---------------------------------------------------------------------------

/// generateContent shaped upstream; the key travels as the `key` query parameter.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    base_url: String,
    model: String,
    system_prompt: String,
}

impl GeminiAdapter {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            base_url: crate::config::DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.gemini_model.clone(), config.system_prompt.clone())
            .with_base_url(config.gemini_base_url.clone())
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(&self, request: &GatewayRequest) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> =
            request.messages.iter().map(convert_message).collect();
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": request.user_input }],
        }));

        json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": self.system_prompt }],
            },
        })
    }
}

fn convert_message(msg: &ChatMessage) -> serde_json::Value {
    let role = match msg.role {
        ChatRole::Assistant => "model",
        ChatRole::User => "user",
    };
    json!({
        "role": role,
        "parts": [{ "text": msg.content }],
    })
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_call(&self, request: &GatewayRequest, credential: &Credential) -> UpstreamCall {
        UpstreamCall {
            provider: self.name(),
            url: format!("{}/models/{}:generateContent", self.base_url, self.model),
            headers: vec![],
            query: vec![("key".to_string(), credential.expose().to_string())],
            body: self.build_request_body(request),
        }
    }

    fn extract_text(&self, body: &serde_json::Value) -> String {
        body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
