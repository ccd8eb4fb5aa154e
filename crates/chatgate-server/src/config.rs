use std::net::SocketAddr;

use anyhow::Context as _;
use chatgate_llm::GatewayConfig;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("CHATGATE_LISTEN_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = raw_addr
            .trim()
            .parse()
            .with_context(|| format!("Invalid CHATGATE_LISTEN_ADDR: {raw_addr}"))?;

        Ok(Self {
            listen_addr,
            gateway: GatewayConfig::from_lookup(lookup),
        })
    }
}
