//! Domain types for release graphs.
//!
//! These mirror the Cincinnati graph document format: release nodes,
//! conditional edge groups, and the risks attached to them.

use crate::error::{Error, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form release metadata (e.g. `io.openshift.upgrades.graph.release.channels`).
pub type Metadata = BTreeMap<String, String>;

/// A single release in a graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Release version. Not validated at parse time.
    pub version: String,

    /// Opaque payload locator, usually an image pull spec.
    pub payload: String,

    /// Release metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// A structured warning attached to conditional edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Risk {
    /// Reference URL describing the risk
    pub url: String,

    /// Short risk identifier
    pub name: String,

    /// Human-readable explanation
    pub message: String,
}

/// An edge inside a conditional group. Endpoints are version strings, not
/// node positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionalEdge {
    /// Source release version
    pub from: String,

    /// Target release version
    pub to: String,
}

impl ConditionalEdge {
    /// Returns `true` if this edge connects exactly `from` to `to`.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }
}

/// One or more conditional edges sharing the same risks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEdgeGroup {
    /// Edges in declaration order
    pub edges: Vec<ConditionalEdge>,

    /// Risks in declaration order
    pub risks: Vec<Risk>,
}

/// A flattened conditional update: one edge plus every risk declared for it
/// by the group it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalUpdate {
    /// Source release version
    pub from: String,

    /// Target release version
    pub to: String,

    /// Risks declared on this edge
    pub risks: Vec<Risk>,
}

/// How conditional edges are weighted against unconditional ones when a
/// path may use both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskPolicy {
    /// A conditional edge costs more than any simple path of unconditional
    /// edges. Paths with fewer risky hops always win; length breaks ties.
    #[default]
    PreferSafe,

    /// Every edge costs one. Risky shortcuts win over longer safe paths.
    Uniform,
}

impl RiskPolicy {
    /// Cost of a single conditional edge in a graph with `vertex_count`
    /// vertices. Unconditional edges always cost one.
    pub fn conditional_weight(self, vertex_count: usize) -> u64 {
        match self {
            // A simple path has at most `vertex_count - 1` edges.
            Self::PreferSafe => u64::try_from(vertex_count).unwrap_or(u64::MAX).max(1),
            Self::Uniform => 1,
        }
    }
}

impl fmt::Display for RiskPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreferSafe => write!(f, "prefer-safe"),
            Self::Uniform => write!(f, "uniform"),
        }
    }
}

/// Supported release architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// x86-64
    Amd64,
    /// 64-bit ARM
    Arm64,
    /// IBM Z
    S390x,
    /// POWER little-endian
    Ppc64le,
    /// Multi-architecture payloads
    Multi,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::S390x => "s390x",
            Self::Ppc64le => "ppc64le",
            Self::Multi => "multi",
        };
        f.write_str(name)
    }
}

/// Parse a node version string as a semantic version.
///
/// # Errors
///
/// Returns `Error::InvalidVersion` if `version` is not valid semver syntax.
pub fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|source| Error::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

/// Append risks not already present, keeping first-seen order.
pub(crate) fn extend_unique(risks: &mut Vec<Risk>, more: &[Risk]) {
    for risk in more {
        if !risks.contains(risk) {
            risks.push(risk.clone());
        }
    }
}
