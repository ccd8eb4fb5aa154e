use serde_json::json;

use crate::{
    ChatMessage, Credential, GatewayConfig, GatewayRequest, ProviderAdapter, UpstreamCall,
};

// ---------------------------------------------------------------------------
// OpenAiAdapter
// ---------------------------------------------------------------------------

/// Chat-completions shaped upstream (`POST /v1/chat/completions`, bearer auth).
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    base_url: String,
    model: String,
    system_prompt: String,
}

impl OpenAiAdapter {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            base_url: crate::config::DEFAULT_OPENAI_BASE_URL.to_string(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.openai_model.clone(), config.system_prompt.clone())
            .with_base_url(config.openai_base_url.clone())
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(&self, request: &GatewayRequest) -> serde_json::Value {
        // system, then prior turns with roles passed through, then the new user turn
        let mut messages = Vec::with_capacity(request.messages.len() + 2);
        messages.push(json!({ "role": "system", "content": self.system_prompt }));
        messages.extend(request.messages.iter().map(convert_message));
        messages.push(json!({ "role": "user", "content": request.user_input }));

        json!({
            "model": self.model,
            "messages": messages,
        })
    }
}

fn convert_message(msg: &ChatMessage) -> serde_json::Value {
    json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_call(&self, request: &GatewayRequest, credential: &Credential) -> UpstreamCall {
        UpstreamCall {
            provider: self.name(),
            url: format!("{}/v1/chat/completions", self.base_url),
            headers: vec![(
                "Authorization".to_string(),
                format!("Bearer {}", credential.expose()),
            )],
            query: vec![],
            body: self.build_request_body(request),
        }
    }

    fn extract_text(&self, body: &serde_json::Value) -> String {
        body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
