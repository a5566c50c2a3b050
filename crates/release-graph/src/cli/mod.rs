//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for release-graph using
//! clap's derive API. Graph documents come from `--graph` flags and/or a
//! configuration file (see [`crate::config`]).
//!
//! # Commands
//!
//! - `releases`: List every known release
//! - `payload`: Show the payload locator of a release
//! - `metadata`: Show release metadata
//! - `updates`: List direct updates from (or, with `--reverse`, to) a release
//! - `conditional`: List conditional updates with their risks
//! - `path`: Find the shortest update path between two releases
//! - `risks`: Show the risks of a conditional edge
//!
//! # Example
//!
//! ```bash
//! release-graph -g stable-4.19.json -g stable-4.20.json path 4.19.13 4.20.2
//! release-graph -g stable-4.19.json path 4.19.11 4.19.17 --allow-risks
//! release-graph --json -c release-graph.yaml updates 4.19.0
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Re-export argument structs
pub use args::{EdgeArgs, PathArgs, ReleaseArgs, UpdatesArgs};

// Re-export types
pub use types::RiskPolicyArg;

// Re-export validators and helpers for external use
pub use execute::path_steps;
pub use validators::validate_version;

use crate::config::{CONFIG_FILE_NAME, GraphConfig, GraphSource};
use crate::output::OutputMode;

/// Release Graph - upgrade path resolution over Cincinnati graphs
///
/// Load one or more update graph documents and query releases, direct
/// updates, shortest update paths and conditional update risks.
#[derive(Parser, Debug)]
#[command(name = "release-graph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Graph document to load (repeatable, loaded after configured graphs)
    #[arg(short = 'g', long = "graph", global = true, value_name = "FILE")]
    pub graphs: Vec<PathBuf>,

    /// Configuration file (defaults to ./release-graph.yaml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How conditional edges are weighted by `path --allow-risks`
    #[arg(long, global = true, value_enum)]
    pub risk_policy: Option<RiskPolicyArg>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every known release, sorted by version
    Releases,

    /// Show the payload locator of a release
    Payload(ReleaseArgs),

    /// Show release metadata
    Metadata(ReleaseArgs),

    /// List direct (unconditional) updates of a release
    Updates(UpdatesArgs),

    /// List conditional updates of a release with their risks
    Conditional(UpdatesArgs),

    /// Find the shortest update path between two releases
    ///
    /// By default only unconditional edges are used. With --allow-risks,
    /// conditional edges may be crossed and each hop lists its risks.
    Path(PathArgs),

    /// Show the risks declared on a conditional edge
    Risks(EdgeArgs),
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns a clap error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Assemble the effective configuration: config file first, then
    /// `--graph` flags, then `--risk-policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file cannot be
    /// loaded, or the default one exists but is invalid.
    pub async fn resolve_config(&self) -> Result<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::load(path)
                .await
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => load_default_config(Path::new("")).await?,
        };

        config
            .graphs
            .extend(self.graphs.iter().cloned().map(GraphSource::new));
        if let Some(policy) = self.risk_policy {
            config.risk_policy = Some(policy.into());
        }
        Ok(config)
    }

    /// Execute the parsed command
    ///
    /// # Errors
    ///
    /// Returns an error if loading the graphs or the query fails.
    pub async fn execute(&self) -> Result<()> {
        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Release graph upgrade path resolver");
            println!("Use --help for more information");
            return Ok(());
        };

        let config = self.resolve_config().await?;
        let client = config
            .load_client()
            .await
            .context("failed to load release graphs")?;

        match command {
            Commands::Releases => execute::execute_releases(&client, output_mode),
            Commands::Payload(args) => execute::execute_payload(&client, args, output_mode),
            Commands::Metadata(args) => execute::execute_metadata(&client, args, output_mode),
            Commands::Updates(args) => execute::execute_updates(&client, args, output_mode),
            Commands::Conditional(args) => {
                execute::execute_conditional(&client, args, output_mode)
            }
            Commands::Path(args) => execute::execute_path(&client, args, output_mode),
            Commands::Risks(args) => execute::execute_risks(&client, args, output_mode),
        }
    }
}

/// Load `release-graph.yaml` from `dir` if it exists, or an empty config.
///
/// Only a missing file falls back to the default; any other error while
/// checking for it is returned.
async fn load_default_config(dir: &Path) -> Result<GraphConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    let exists = tokio::fs::try_exists(&path)
        .await
        .with_context(|| format!("failed to check for config {}", path.display()))?;
    if !exists {
        return Ok(GraphConfig::default());
    }
    GraphConfig::load(&path)
        .await
        .with_context(|| format!("failed to load config {}", path.display()))
}
