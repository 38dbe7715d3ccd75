//! VisaFlow daemon - guided visa-workflow session service
//!
//! The daemon exposes the session engine over JSON-over-HTTP:
//! - session lifecycle and event application
//! - flow catalog and demo scenarios
//! - micro-checks and advisor packet rendering

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visaflow_daemon::{config::DaemonConfig, error, server::Server};

/// VisaFlow daemon CLI
#[derive(Parser)]
#[command(name = "visaflowd")]
#[command(about = "VisaFlow daemon - guided visa-workflow session service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "VISAFLOW_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(
        short,
        long,
        env = "VISAFLOW_LISTEN_ADDR",
        default_value = "127.0.0.1:8600"
    )]
    listen: String,

    /// Log level
    #[arg(long, env = "VISAFLOW_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "VISAFLOW_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> error::DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())?;

    // Override with CLI args
    config.server.listen_addr = cli
        .listen
        .parse()
        .map_err(|e| error::DaemonError::Config(format!("Invalid listen address: {}", e)))?;

    println!(
        "visaflowd {} listening on {}",
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    Server::new(config).run().await
}
