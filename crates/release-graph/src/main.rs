//! Release graph CLI binary.

use anyhow::Result;
use release_graph::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the release-graph CLI.
///
/// Uses tokio's current_thread runtime; the only async work is reading
/// graph documents and configuration from disk.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=release_graph=debug cargo run -- -g graph.json releases
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("release_graph=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting release-graph CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("release-graph CLI completed successfully");
    Ok(())
}
