//! # scoring-api server entry point
//!
//! Parses command-line arguments, initializes tracing and serves the
//! scoring API on tokio.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scoring_api::AppState;

/// Scoring method-call API server.
#[derive(Parser, Debug)]
#[command(name = "scoring-api", version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let state = AppState::new();
    let app = scoring_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "starting scoring API server");
    axum::serve(listener, app).await
}
