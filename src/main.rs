//! Trust Brief MCP service binary.
//!
//! Serves the MCP tool surface over HTTP:
//! - bearer-token validation (`/mcp/validate`)
//! - trust-brief claim analysis (`/mcp/analyze_claim`)
//!
//! Configuration comes from the environment (`OWNER_PHONE`,
//! `VALIDATION_TOKEN`, `PORT`), read once at startup.

use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "trust-brief")]
#[command(version, about = "MCP trust-brief service", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug)?;

    info!("Trust Brief service starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    trust_brief::server::run_from_env().await
}

/// Initialize tracing subscriber for logging
fn init_logging(debug: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = if debug {
        EnvFilter::new("trust_brief=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("trust_brief=info,tower_http=info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();

    Ok(())
}
