use std::fmt;
use std::time::Duration;

use crate::ProviderKind;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer clearly and concisely.";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An API secret. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Everything the gateway reads at request time, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub openai_api_key: Option<Credential>,
    pub gemini_api_key: Option<Credential>,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub openai_model: String,
    pub gemini_model: String,
    pub system_prompt: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // A zero timeout would fail every request, so it falls back like garbage does.
        let timeout_ms = get("CHATGATE_TIMEOUT_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            openai_api_key: get("OPENAI_API_KEY").map(Credential::new),
            // API_KEY is the legacy name for the Gemini key.
            gemini_api_key: get("GEMINI_API_KEY")
                .or_else(|| get("API_KEY"))
                .map(Credential::new),
            openai_base_url: get("CHATGATE_OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            gemini_base_url: get("CHATGATE_GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            openai_model: get("CHATGATE_OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            gemini_model: get("CHATGATE_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            system_prompt: get("CHATGATE_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn credential_for(&self, kind: ProviderKind) -> Option<&Credential> {
        match kind {
            ProviderKind::OpenAi => self.openai_api_key.as_ref(),
            ProviderKind::Gemini => self.gemini_api_key.as_ref(),
        }
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(Credential::new(key));
        self
    }

    pub fn with_gemini_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(Credential::new(key));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    /// Defaults with no credentials configured.
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_variables() {
        let config = GatewayConfig::default();
        assert!(config.openai_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_provider_keys() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("GEMINI_API_KEY", "g-key"),
        ]));
        assert_eq!(
            config.credential_for(ProviderKind::OpenAi).map(Credential::expose),
            Some("sk-openai")
        );
        assert_eq!(
            config.credential_for(ProviderKind::Gemini).map(Credential::expose),
            Some("g-key")
        );
    }

    #[test]
    fn legacy_alias_used_for_gemini_only() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("API_KEY", "legacy")]));
        assert_eq!(
            config.credential_for(ProviderKind::Gemini).map(Credential::expose),
            Some("legacy")
        );
        assert!(config.credential_for(ProviderKind::OpenAi).is_none());
    }

    #[test]
    fn primary_gemini_key_wins_over_alias() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("API_KEY", "legacy"),
            ("GEMINI_API_KEY", "primary"),
        ]));
        assert_eq!(
            config.credential_for(ProviderKind::Gemini).map(Credential::expose),
            Some("primary")
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", ""),
            ("GEMINI_API_KEY", "   "),
            ("CHATGATE_TIMEOUT_MS", ""),
        ]));
        assert!(config.openai_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("CHATGATE_TIMEOUT_MS", "soon")]));
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));

        let config = GatewayConfig::from_lookup(lookup_from(&[("CHATGATE_TIMEOUT_MS", "1500")]));
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("CHATGATE_TIMEOUT_MS", "0")]));
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let config = GatewayConfig::default().with_openai_key("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("Credential(***)"));
    }
}
