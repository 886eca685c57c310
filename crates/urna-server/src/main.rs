//! Urna server binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve the demo ballot on the default port
//! urna-server
//!
//! # Custom ballot and bind address
//! urna-server --bind 0.0.0.0:4950 --candidate Ada --candidate Grace
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use urna_server::{DEFAULT_BIND_ADDRESS, Server, ServerConfig};

/// Urna voting server
#[derive(Parser, Debug)]
#[command(name = "urna-server")]
#[command(about = "Single-election voting server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,

    /// Candidate on the ballot; repeat once per candidate
    /// (defaults to the demo ballot when omitted)
    #[arg(long = "candidate", value_name = "NAME")]
    candidates: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let mut config = ServerConfig { bind_address: args.bind, ..ServerConfig::default() };
    if !args.candidates.is_empty() {
        config.candidates = args.candidates;
    }

    tracing::info!("urna server starting");

    let server = Server::bind(config).await?;

    tracing::info!("server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
