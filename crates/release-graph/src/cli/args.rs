//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use semver::Version;

use super::validators::validate_version;

/// Arguments for commands that take a single release
#[derive(Parser, Debug, Clone)]
pub struct ReleaseArgs {
    /// Release version (e.g., 4.19.0)
    #[arg(id = "release_version", value_name = "VERSION", value_parser = validate_version)]
    pub version: Version,
}

/// Arguments for the `updates` and `conditional` commands
#[derive(Parser, Debug, Clone)]
pub struct UpdatesArgs {
    /// Release version (e.g., 4.19.0)
    #[arg(id = "release_version", value_name = "VERSION", value_parser = validate_version)]
    pub version: Version,

    /// List releases that update *to* the version instead of from it
    #[arg(short, long)]
    pub reverse: bool,
}

/// Arguments for the `path` command
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {
    /// Release to update from
    #[arg(value_parser = validate_version)]
    pub from: Version,

    /// Release to update to
    #[arg(value_parser = validate_version)]
    pub to: Version,

    /// Allow conditional (risk-annotated) edges
    #[arg(short = 'r', long)]
    pub allow_risks: bool,
}

/// Arguments for the `risks` command
#[derive(Parser, Debug, Clone)]
pub struct EdgeArgs {
    /// Edge source release
    #[arg(value_parser = validate_version)]
    pub from: Version,

    /// Edge target release
    #[arg(value_parser = validate_version)]
    pub to: Version,
}
