//! FaceSwap proxy server.
//!
//! ```text
//!   browser ──multipart(source, target)──▶ /api/swap ──▶ upload receiver
//!                                                            │
//!                                                            ▼
//!   browser ◀── image/jpeg or JSON error ◀── mapper ◀── provider client ──▶ provider API
//!
//!   browser ──multipart──▶ /api/simulate-swap ──▶ simulator (delay + placeholder)
//! ```

use std::path::PathBuf;

use clap::Parser;

use faceswap_proxy::config::load_config;
use faceswap_proxy::lifecycle::startup;
use faceswap_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "faceswap-proxy")]
#[command(about = "HTTP proxy in front of a face-swap provider", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port, overriding the config file and PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.set_port(port);
    }

    logging::init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        environment = ?config.server.environment,
        provider_timeout_secs = config.provider.timeout_secs,
        max_file_bytes = config.upload.max_file_bytes,
        "faceswap-proxy starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
