use std::sync::Arc;

use tracing::Instrument;

use chatgate_types::GatewayError;

use crate::{
    GatewayConfig, GatewayRequest, GatewayResponse, GeminiAdapter, HttpTransport, OpenAiAdapter,
    ProviderAdapter, ProviderKind, ReqwestTransport,
};

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Routes one normalized request to exactly one upstream provider.
///
/// Holds only read-only state, so a single instance can be shared behind an
/// `Arc` by any number of concurrent requests.
pub struct Gateway {
    config: GatewayConfig,
    openai: OpenAiAdapter,
    gemini: GeminiAdapter,
    transport: Arc<dyn HttpTransport>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            openai: OpenAiAdapter::from_config(&config),
            gemini: GeminiAdapter::from_config(&config),
            config,
            transport,
        }
    }

    pub fn adapter(&self, kind: ProviderKind) -> &dyn ProviderAdapter {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
        }
    }

    /// Dispatch and fold any failure into an error response. Failures are
    /// logged here, once, before they are returned.
    pub async fn dispatch(&self, request: &GatewayRequest) -> GatewayResponse {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "dispatch",
            %request_id,
            provider = %request.provider,
            messages = request.messages.len(),
        );

        async {
            match self.try_dispatch(request).await {
                Ok(text) => {
                    tracing::info!(chars = text.len(), "Gateway dispatch succeeded");
                    GatewayResponse::text(text)
                }
                Err(err) => {
                    tracing::error!(kind = err.kind(), error = %err, "Gateway dispatch failed");
                    GatewayResponse::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Resolve the credential, make the single upstream call under the
    /// configured timeout, and extract the reply text.
    pub async fn try_dispatch(&self, request: &GatewayRequest) -> Result<String, GatewayError> {
        let kind = request.provider_kind();
        if !ProviderKind::is_known_name(&request.provider) {
            tracing::debug!(
                requested = %request.provider,
                "Unrecognized provider, falling back to gemini"
            );
        }
        let adapter = self.adapter(kind);

        let credential =
            self.config
                .credential_for(kind)
                .ok_or_else(|| GatewayError::CredentialsMissing {
                    provider: adapter.name().into(),
                })?;

        let call = adapter.build_call(request, credential);
        tracing::debug!(upstream = adapter.name(), model = adapter.model(), "Calling upstream");

        // Dropping the transport future on timeout cancels the in-flight request.
        let timeout = self.config.timeout;
        let reply = match tokio::time::timeout(timeout, self.transport.post_json(call)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GatewayError::UpstreamTimeout {
                    provider: adapter.name().into(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        };

        if !reply.is_success() {
            return Err(adapter.map_error(reply.status, &reply.body));
        }

        let json: serde_json::Value =
            serde_json::from_str(&reply.body).map_err(|e| GatewayError::MalformedResponse {
                provider: adapter.name().into(),
                message: format!("Failed to parse response JSON: {e}"),
            })?;

        Ok(adapter.extract_text(&json))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
