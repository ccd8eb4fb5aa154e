use serde::Serialize;

// ---------------------------------------------------------------------------
// ChatRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Lenient parse: only the exact string `"assistant"` is an assistant turn.
    pub fn from_wire(role: &str) -> Self {
        if role == "assistant" {
            ChatRole::Assistant
        } else {
            ChatRole::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

pub const DEFAULT_PROVIDER: &str = "GEMINI";

/// The closed set of upstream providers the gateway can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Case-insensitive lookup. Anything that is not `OPENAI` routes to Gemini,
    /// including names no provider recognizes.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("OPENAI") {
            ProviderKind::OpenAi
        } else {
            ProviderKind::Gemini
        }
    }

    /// Whether `name` is one of the provider names the gateway knows about.
    pub fn is_known_name(name: &str) -> bool {
        name.eq_ignore_ascii_case("OPENAI") || name.eq_ignore_ascii_case("GEMINI")
    }
}

// ---------------------------------------------------------------------------
// GatewayRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    /// Upper-cased provider name as received (defaults to `GEMINI`).
    pub provider: String,
    pub messages: Vec<ChatMessage>,
    pub user_input: String,
}

impl GatewayRequest {
    pub fn new(provider: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            provider: provider.into().to_uppercase(),
            messages: Vec::new(),
            user_input: user_input.into(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn provider_kind(&self) -> ProviderKind {
        ProviderKind::from_name(&self.provider)
    }
}

impl Default for GatewayRequest {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            messages: Vec::new(),
            user_input: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayResponse
// ---------------------------------------------------------------------------

/// Whole-response outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    Text { text: String },
    Error { error: String, http_status: u16 },
}

impl GatewayResponse {
    pub fn text(text: impl Into<String>) -> Self {
        GatewayResponse::Text { text: text.into() }
    }

    pub fn from_error(err: &chatgate_types::GatewayError) -> Self {
        GatewayResponse::Error {
            error: err.to_string(),
            http_status: err.http_status(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            GatewayResponse::Text { .. } => 200,
            GatewayResponse::Error { http_status, .. } => *http_status,
        }
    }

    /// JSON body sent back to the inbound caller: `{"text"}` or `{"error"}`.
    pub fn body(&self) -> serde_json::Value {
        match self {
            GatewayResponse::Text { text } => serde_json::json!({ "text": text }),
            GatewayResponse::Error { error, .. } => serde_json::json!({ "error": error }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
