//! CLI binary for serving the chatgate gateway and sending prompts to it.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};

use chatgate_llm::{Gateway, GatewayClient, DEFAULT_GATEWAY_URL};
use chatgate_server::{app_router, config::ServerConfig, init_tracing, AppState};

#[derive(Parser)]
#[command(name = "chatgate", version, about = "One HTTP contract in front of OpenAI and Gemini chat APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Address to listen on (default: CHATGATE_LISTEN_ADDR or 127.0.0.1:8787)
        #[arg(short, long)]
        listen: Option<SocketAddr>,

        /// Upstream call timeout in milliseconds (default: CHATGATE_TIMEOUT_MS or 30000)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_ms: Option<u64>,
    },

    /// Send one prompt to a running gateway and print the reply
    Ask {
        /// The prompt text
        prompt: String,

        /// Provider name (OPENAI or GEMINI)
        #[arg(short, long, default_value = "GEMINI")]
        provider: String,

        /// Gateway base URL
        #[arg(long, default_value = DEFAULT_GATEWAY_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    init_tracing(filter);

    match cli.command {
        Commands::Serve { listen, timeout_ms } => cmd_serve(listen, timeout_ms).await?,
        Commands::Ask {
            prompt,
            provider,
            url,
        } => cmd_ask(&prompt, &provider, &url).await?,
    }

    Ok(())
}

async fn cmd_serve(listen: Option<SocketAddr>, timeout_ms: Option<u64>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = listen {
        config.listen_addr = addr;
    }
    if let Some(ms) = timeout_ms {
        config.gateway = config.gateway.with_timeout(Duration::from_millis(ms));
    }

    if config.gateway.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; OpenAI requests will fail with API_KEY_MISSING");
    }
    if config.gateway.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; Gemini requests will fail with API_KEY_MISSING");
    }

    let state = AppState::new(Gateway::new(config.gateway));
    let app = app_router(state);

    tracing::info!("listening on http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn cmd_ask(prompt: &str, provider: &str, url: &str) -> anyhow::Result<()> {
    let client = GatewayClient::new(url);
    let text = client.ask(provider, Vec::new(), prompt).await?;
    println!("{text}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
