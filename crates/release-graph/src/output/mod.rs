//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON. Text writers
//! take any `Write` so they can be exercised against a buffer.

pub mod color;

use crate::domain::{ConditionalUpdate, Metadata, Risk};
use semver::Version;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{bold, dimmed, info, success, warning};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `RELEASE_GRAPH_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let no_color = env::var_os("NO_COLOR").is_some();
        let disabled = env::var("RELEASE_GRAPH_COLOR")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "0" | "false"))
            .unwrap_or(false);
        Self::new(!no_color && !disabled)
    }
}

/// One hop of an update path, with any risks recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    /// Source release
    pub from: Version,
    /// Target release
    pub to: Version,
    /// Risks recorded on a conditional edge for this hop; empty otherwise
    pub risks: Vec<Risk>,
}

/// Print a value as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Write a headed list of versions, one per line.
pub fn write_versions<W: Write>(
    w: &mut W,
    heading: &str,
    versions: &[Version],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{} ({})", bold(heading, config), versions.len())?;
    if versions.is_empty() {
        writeln!(w, "  {}", dimmed("(none)", config))?;
    }
    for version in versions {
        writeln!(w, "  {}", info(&version.to_string(), config))?;
    }
    Ok(())
}

/// Write the payload locator of a release.
pub fn write_payload<W: Write>(
    w: &mut W,
    version: &Version,
    payload: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        info(&version.to_string(), config),
        dimmed(payload, config)
    )
}

/// Write release metadata as aligned `key: value` lines.
pub fn write_metadata<W: Write>(
    w: &mut W,
    version: &Version,
    metadata: &Metadata,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", info(&version.to_string(), config))?;
    let width = metadata.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in metadata {
        let label = format!("{key:width$}:");
        writeln!(w, "  {} {value}", dimmed(&label, config))?;
    }
    Ok(())
}

/// Write an update path as a numbered list of hops.
pub fn write_path<W: Write>(w: &mut W, steps: &[PathStep], config: &OutputConfig) -> io::Result<()> {
    let hops = steps.len();
    writeln!(
        w,
        "{} ({hops} {})",
        bold("Update path", config),
        if hops == 1 { "hop" } else { "hops" }
    )?;
    for (number, step) in steps.iter().enumerate() {
        let marker = if step.risks.is_empty() {
            success("safe", config)
        } else {
            warning(&format!("{} risk(s)", step.risks.len()), config)
        };
        writeln!(
            w,
            "  {}. {} -> {} [{marker}]",
            number + 1,
            info(&step.from.to_string(), config),
            info(&step.to.to_string(), config),
        )?;
        for risk in &step.risks {
            writeln!(w, "       - {}", warning(&risk.name, config))?;
        }
    }
    Ok(())
}

/// Write the risks of one conditional edge.
pub fn write_risks<W: Write>(
    w: &mut W,
    from: &Version,
    to: &Version,
    risks: &[Risk],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} -> {}",
        bold("Risks for", config),
        info(&from.to_string(), config),
        info(&to.to_string(), config)
    )?;
    for risk in risks {
        write_risk(w, risk, config)?;
    }
    Ok(())
}

/// Write conditional updates with their risks.
pub fn write_conditional_updates<W: Write>(
    w: &mut W,
    heading: &str,
    updates: &[ConditionalUpdate],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{} ({})", bold(heading, config), updates.len())?;
    if updates.is_empty() {
        writeln!(w, "  {}", dimmed("(none)", config))?;
    }
    for update in updates {
        writeln!(
            w,
            "  {} -> {}",
            info(&update.from, config),
            info(&update.to, config)
        )?;
        for risk in &update.risks {
            write_risk(w, risk, config)?;
        }
    }
    Ok(())
}

fn write_risk<W: Write>(w: &mut W, risk: &Risk, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "    - {}: {}", warning(&risk.name, config), risk.message)?;
    writeln!(w, "      {}", dimmed(&risk.url, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> OutputConfig {
        OutputConfig::new(false)
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn risk(name: &str) -> Risk {
        Risk {
            url: format!("https://example.com/{name}"),
            name: name.to_string(),
            message: format!("{name} happens"),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_versions() {
        let out = render(|w| write_versions(w, "Releases", &[v("4.19.0"), v("4.19.1")], &plain()));
        assert_eq!(out, "Releases (2)\n  4.19.0\n  4.19.1\n");
    }

    #[test]
    fn test_write_versions_empty() {
        let out = render(|w| write_versions(w, "Updates from 4.19.7", &[], &plain()));
        assert!(out.contains("(none)"));
    }

    #[test]
    fn test_write_metadata_aligns_keys() {
        let metadata = Metadata::from([
            ("a".to_string(), "1".to_string()),
            ("long-key".to_string(), "2".to_string()),
        ]);
        let out = render(|w| write_metadata(w, &v("4.19.0"), &metadata, &plain()));
        assert!(out.contains("  a       : 1\n"));
        assert!(out.contains("  long-key: 2\n"));
    }

    #[test]
    fn test_write_path_marks_risky_hops() {
        let steps = vec![
            PathStep {
                from: v("4.19.11"),
                to: v("4.19.15"),
                risks: vec![risk("A"), risk("B")],
            },
            PathStep {
                from: v("4.19.15"),
                to: v("4.19.17"),
                risks: vec![],
            },
        ];
        let out = render(|w| write_path(w, &steps, &plain()));
        assert!(out.starts_with("Update path (2 hops)\n"));
        assert!(out.contains("1. 4.19.11 -> 4.19.15 [2 risk(s)]"));
        assert!(out.contains("2. 4.19.15 -> 4.19.17 [safe]"));
        assert!(out.contains("       - A\n"));
    }

    #[test]
    fn test_write_risks() {
        let out = render(|w| write_risks(w, &v("4.19.11"), &v("4.19.15"), &[risk("A")], &plain()));
        assert!(out.contains("Risks for 4.19.11 -> 4.19.15"));
        assert!(out.contains("- A: A happens"));
        assert!(out.contains("https://example.com/A"));
    }

    #[test]
    fn test_write_conditional_updates() {
        let updates = vec![ConditionalUpdate {
            from: "4.19.11".into(),
            to: "4.19.15".into(),
            risks: vec![risk("A")],
        }];
        let out = render(|w| write_conditional_updates(w, "Conditional updates", &updates, &plain()));
        assert!(out.starts_with("Conditional updates (1)\n"));
        assert!(out.contains("4.19.11 -> 4.19.15"));
    }
}
