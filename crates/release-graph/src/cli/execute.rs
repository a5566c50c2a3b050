//! Command execution logic.
//!
//! Query commands are written against [`ReleaseIntrospector`] so they work
//! with any graph source; only `conditional` needs the concrete client.

use anyhow::Result;
use semver::Version;
use std::io;

use super::args::{EdgeArgs, PathArgs, ReleaseArgs, UpdatesArgs};
use crate::client::ReleaseClient;
use crate::introspect::ReleaseIntrospector;
use crate::output::{self, OutputConfig, OutputMode, PathStep};

/// Execute the releases command
pub fn execute_releases(
    introspector: &dyn ReleaseIntrospector,
    output_mode: OutputMode,
) -> Result<()> {
    let releases = introspector.releases()?;
    match output_mode {
        OutputMode::Json => output::print_json(&releases)?,
        OutputMode::Text => output::write_versions(
            &mut io::stdout().lock(),
            "Releases",
            &releases,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Execute the payload command
pub fn execute_payload(
    introspector: &dyn ReleaseIntrospector,
    args: &ReleaseArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let payload = introspector.payload(&args.version)?;
    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "version": args.version,
            "payload": payload,
        }))?,
        OutputMode::Text => output::write_payload(
            &mut io::stdout().lock(),
            &args.version,
            &payload,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Execute the metadata command
pub fn execute_metadata(
    introspector: &dyn ReleaseIntrospector,
    args: &ReleaseArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let metadata = introspector.metadata(&args.version)?;
    match output_mode {
        OutputMode::Json => output::print_json(&metadata)?,
        OutputMode::Text => output::write_metadata(
            &mut io::stdout().lock(),
            &args.version,
            &metadata,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Execute the updates command
pub fn execute_updates(
    introspector: &dyn ReleaseIntrospector,
    args: &UpdatesArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let (heading, updates) = if args.reverse {
        (
            format!("Updates to {}", args.version),
            introspector.updates_to(&args.version)?,
        )
    } else {
        (
            format!("Updates from {}", args.version),
            introspector.updates_from(&args.version)?,
        )
    };
    match output_mode {
        OutputMode::Json => output::print_json(&updates)?,
        OutputMode::Text => output::write_versions(
            &mut io::stdout().lock(),
            &heading,
            &updates,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Execute the conditional command
pub fn execute_conditional(
    client: &ReleaseClient,
    args: &UpdatesArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let (heading, updates) = if args.reverse {
        (
            format!("Conditional updates to {}", args.version),
            client.conditional_updates_to(&args.version)?,
        )
    } else {
        (
            format!("Conditional updates from {}", args.version),
            client.conditional_updates_from(&args.version)?,
        )
    };
    match output_mode {
        OutputMode::Json => output::print_json(&updates)?,
        OutputMode::Text => output::write_conditional_updates(
            &mut io::stdout().lock(),
            &heading,
            &updates,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Execute the path command
pub fn execute_path(
    introspector: &dyn ReleaseIntrospector,
    args: &PathArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let path = if args.allow_risks {
        introspector.update_path_with_risks(&args.from, &args.to)?
    } else {
        introspector.update_path(&args.from, &args.to)?
    };
    let steps = path_steps(introspector, &path, args.allow_risks)?;
    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "path": path,
            "steps": steps,
        }))?,
        OutputMode::Text => {
            output::write_path(&mut io::stdout().lock(), &steps, &OutputConfig::from_env())?;
        }
    }
    Ok(())
}

/// Execute the risks command
pub fn execute_risks(
    introspector: &dyn ReleaseIntrospector,
    args: &EdgeArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let risks = introspector.risks(&args.from, &args.to)?;
    match output_mode {
        OutputMode::Json => output::print_json(&risks)?,
        OutputMode::Text => output::write_risks(
            &mut io::stdout().lock(),
            &args.from,
            &args.to,
            &risks,
            &OutputConfig::from_env(),
        )?,
    }
    Ok(())
}

/// Split a path into hops, attaching recorded risks when risky edges were
/// allowed.
///
/// A hop that is also a direct update was searched as unconditional, so it
/// gets an empty risk list even if a conditional edge is recorded for the
/// same pair. Likewise for a hop with no recorded conditional edge. Any
/// other lookup failure is returned.
pub fn path_steps(
    introspector: &dyn ReleaseIntrospector,
    path: &[Version],
    allow_risks: bool,
) -> crate::error::Result<Vec<PathStep>> {
    path.windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let risks = if allow_risks && !is_direct_update(introspector, from, to)? {
                match introspector.risks(from, to) {
                    Ok(risks) => risks,
                    Err(e) if e.is_not_found() => Vec::new(),
                    Err(e) => return Err(e),
                }
            } else {
                Vec::new()
            };
            Ok(PathStep {
                from: from.clone(),
                to: to.clone(),
                risks,
            })
        })
        .collect()
}

/// Returns `true` if `to` is an unconditional update of `from`. A `from`
/// that only appears as a conditional endpoint has no direct updates.
fn is_direct_update(
    introspector: &dyn ReleaseIntrospector,
    from: &Version,
    to: &Version,
) -> crate::error::Result<bool> {
    match introspector.updates_from(from) {
        Ok(updates) => Ok(updates.contains(to)),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}
