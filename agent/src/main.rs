use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_agent::cli::{Cli, Commands};
use content_agent::config::AppConfig;
use content_agent::handlers::{self, CommandContext};

/// Initialize tracing with the given verbosity level
/// 0 = warn (default), 1 = info (-v), 2 = debug (-vv), 3+ = trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from_path(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load()?,
    };
    let ctx = CommandContext::new(cli.model, cli.base_url, config);

    match cli.command {
        Commands::Run { query } => handlers::run_flow(&ctx, &query).await,
        Commands::Serve { port } => handlers::run_serve(&ctx, port).await,
    }
}
