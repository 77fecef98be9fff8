//! Verified Profile Front End (v1)
//!
//! Serves the profile and withdraw pages as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                VERIFIED PROFILE                   │
//!   Client        │  ┌─────────┐    ┌──────────────┐                  │
//!   ──────────────┼─▶│  http   │───▶│ profile page │──────────────────┼──▶ Profile API
//!                 │  │ server  │    └──────────────┘                  │
//!                 │  │         │    ┌──────────────┐   ┌───────────┐  │
//!                 │  │         │───▶│withdraw page │──▶│  gateway  │──┼──▶ JSON-RPC
//!                 │  └─────────┘    └──────────────┘   └───────────┘  │
//!                 │                                                   │
//!                 │   config · observability · lifecycle · ui         │
//!                 └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use verified_profile::config::load_or_default;
use verified_profile::lifecycle::{initialize, signals, Shutdown};
use verified_profile::observability::{init_logging, metrics};
use verified_profile::HttpServer;

#[derive(Parser)]
#[command(name = "verified-profile")]
#[command(about = "Verified profile front end service", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "VP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("verified-profile v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        profile_url = %config.api.profile_url(),
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let frontend = initialize(config).await?;

    if frontend.withdraw.profile_addr().is_some() {
        // Failures are shown on the page; startup continues.
        let _ = frontend.withdraw.fetch_balances().await;
    }

    let listener = TcpListener::bind(&frontend.config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(frontend.config, frontend.profiles, frontend.withdraw);
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    signals::wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
