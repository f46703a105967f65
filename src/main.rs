//! Flyglance CLI
//!
//! Command-line interface for building and sharing viewer sessions.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flyglance::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Flyglance v{}", env!("CARGO_PKG_VERSION"));

    let config = cli
        .gateway_config()
        .context("Failed to load gateway configuration")?;

    match cli.command {
        Commands::Decode { url } => {
            commands::decode(config, &url).with_context(|| format!("Failed to decode {}", url))
        }
        Commands::Publish { path } => commands::publish(config, &path)
            .with_context(|| format!("Failed to publish {}", path.display())),
        Commands::AddLayer {
            request,
            url,
            space,
            sources,
        } => commands::add_layer(
            config,
            &request,
            url.as_deref(),
            space.as_deref(),
            sources.as_deref(),
        )
        .context("Failed to add layer"),
        Commands::Spaces => commands::list_spaces().context("Failed to list spaces"),
    }
}
