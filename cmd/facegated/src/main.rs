//! facegated - face-authentication and code-generation service daemon.

use clap::Parser;

mod config;
mod generate;
mod rate_limit;
mod server;

use config::Settings;

/// Face-authentication service daemon.
///
/// Serves face signup/login backed by a capacity-bounded identity
/// store, plus chat and code generation proxied to an Ollama server.
/// Configuration comes from FACEGATE_* environment variables; the flags
/// below override the listen address and store location.
#[derive(Parser)]
#[command(name = "facegated")]
#[command(about = "Face-authentication service daemon")]
#[command(version)]
pub struct Cli {
    /// Listen address (overrides FACEGATE_ADDR)
    #[arg(long)]
    pub addr: Option<String>,

    /// Identity database path (overrides FACEGATE_STORE_PATH)
    #[arg(long)]
    pub store_path: Option<String>,

    /// Keep identities in memory only; nothing is persisted
    #[arg(long)]
    pub memory_store: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    let mut settings = Settings::from_env();
    if let Some(addr) = cli.addr {
        settings.addr = addr;
    }
    if let Some(path) = cli.store_path {
        settings.store_path = path.into();
    }

    server::run(settings, cli.memory_store).await
}
