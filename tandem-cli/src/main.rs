use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::net::SocketAddr;
use tandem::server::{DEFAULT_STUN_URL, ServerConfig, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Two-party WebRTC signaling server.
#[derive(Parser, Debug)]
#[command(name = "tandem-signal", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000", env = "TANDEM_BIND")]
    bind: SocketAddr,

    /// STUN servers advertised to endpoints (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_STUN_URL, env = "TANDEM_STUN")]
    stun: Vec<String>,

    /// TURN server url advertised to endpoints
    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL", hide_env_values = true)]
    turn_credential: Option<String>,
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_parts(
        args.bind,
        args.stun,
        args.turn_url,
        args.turn_username,
        args.turn_credential,
    )
    .context("Invalid ICE server settings")?;

    println!("{}", "📡 Starting Tandem signaling server...".green().bold());
    for server in &config.ice_servers {
        println!("   {} {}", "ICE:".cyan(), server.urls.join(", "));
    }

    serve(config, shutdown_signal()).await
}
