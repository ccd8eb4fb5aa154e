//! Provider gateway that puts OpenAI-style and Gemini-style chat APIs behind
//! one `{provider, messages, userInput}` → `{text}` contract.
//!
//! Provides the request normalizer, the `ProviderAdapter` translations, the
//! `HttpTransport` seam, the `Gateway` dispatcher, and a typed `GatewayClient`.

mod client;
pub mod config;
mod gateway;
mod gemini;
mod normalize;
mod openai;
mod provider;
mod transport;
mod types;

pub use client::*;
pub use config::{Credential, GatewayConfig};
pub use gateway::*;
pub use gemini::GeminiAdapter;
pub use normalize::*;
pub use openai::OpenAiAdapter;
pub use provider::ProviderAdapter;
pub use transport::*;
pub use types::*;

pub use chatgate_types::GatewayError;
