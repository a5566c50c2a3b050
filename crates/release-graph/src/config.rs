//! Configuration for the release-graph CLI.
//!
//! A YAML file lists the graph documents to load, optionally labelled with
//! the channel and architecture they were fetched for:
//!
//! ```yaml
//! risk-policy: prefer-safe
//! graphs:
//!   - path: graphs/stable-4.19-amd64.json
//!     channel: stable-4.19
//!     arch: amd64
//!   - path: graphs/stable-4.20-amd64.json
//!     channel: stable-4.20
//! ```
//!
//! Relative paths resolve against the directory holding the file.

use crate::client::ReleaseClient;
use crate::domain::{Architecture, RiskPolicy};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "release-graph.yaml";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GraphConfig {
    /// Weighting of conditional edges in risk-aware path queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_policy: Option<RiskPolicy>,

    /// Graph documents to load, in order
    #[serde(default)]
    pub graphs: Vec<GraphSource>,
}

/// One graph document on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphSource {
    /// Path to the JSON document
    pub path: PathBuf,

    /// Channel the document was fetched for (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Architecture the document was fetched for (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Architecture>,
}

impl GraphSource {
    /// A source with no labels.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channel: None,
            arch: None,
        }
    }
}

impl GraphConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the YAML does not match the schema.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file, resolving relative graph paths
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if the file cannot be read
    /// - `Error::Config` if the YAML is invalid
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            for source in &mut config.graphs {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        tracing::debug!(path = %path.display(), graphs = config.graphs.len(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on serialization failure or `Error::Io` on
    /// write failure.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Read every configured document concurrently and build a client.
    ///
    /// Documents keep their configured order regardless of which read
    /// finishes first.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if there are no graphs or a document cannot be read
    /// - a parse failure if any document is malformed
    pub async fn load_client(&self) -> Result<ReleaseClient> {
        if self.graphs.is_empty() {
            return Err(Error::Config(
                "no graph documents configured; pass --graph or add `graphs` to the config file"
                    .to_string(),
            ));
        }

        let reads = self.graphs.iter().map(|source| async move {
            let data = fs::read(&source.path).await.map_err(|e| {
                Error::Config(format!(
                    "cannot read graph document {}: {e}",
                    source.path.display()
                ))
            })?;
            tracing::debug!(
                path = %source.path.display(),
                channel = source.channel.as_deref().unwrap_or("-"),
                arch = source.arch.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
                bytes = data.len(),
                "Read graph document"
            );
            Ok::<_, Error>(data)
        });
        let datas = futures::future::try_join_all(reads).await?;

        let client = ReleaseClient::new(&datas)?;
        Ok(client.with_risk_policy(self.risk_policy.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::ReleaseIntrospector;
    use tempfile::tempdir;

    const GRAPH: &str = r#"{
        "nodes": [
            {"version": "1.0.0", "payload": "a"},
            {"version": "1.1.0", "payload": "b"}
        ],
        "edges": [[0, 1]]
    }"#;

    #[test]
    fn test_from_yaml_full() {
        let config = GraphConfig::from_yaml(
            "risk-policy: uniform\ngraphs:\n  - path: a.json\n    channel: stable-4.19\n    arch: arm64\n",
        )
        .unwrap();
        assert_eq!(config.risk_policy, Some(RiskPolicy::Uniform));
        assert_eq!(config.graphs.len(), 1);
        assert_eq!(config.graphs[0].channel.as_deref(), Some("stable-4.19"));
        assert_eq!(config.graphs[0].arch, Some(Architecture::Arm64));
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = GraphConfig::from_yaml("{}").unwrap();
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_policy() {
        let err = GraphConfig::from_yaml("risk-policy: reckless\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        GraphConfig {
            risk_policy: None,
            graphs: vec![GraphSource::new("graph.json")],
        }
        .save(&config_path)
        .await
        .unwrap();

        let loaded = GraphConfig::load(&config_path).await.unwrap();
        assert_eq!(loaded.graphs[0].path, dir.path().join("graph.json"));
    }

    #[tokio::test]
    async fn test_load_client_reads_documents() {
        let dir = tempdir().unwrap();
        let graph_path = dir.path().join("graph.json");
        std::fs::write(&graph_path, GRAPH).unwrap();

        let config = GraphConfig {
            risk_policy: Some(RiskPolicy::Uniform),
            graphs: vec![GraphSource::new(&graph_path)],
        };
        let client = config.load_client().await.unwrap();
        assert_eq!(client.risk_policy(), RiskPolicy::Uniform);
        assert_eq!(client.releases().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_client_missing_file() {
        let dir = tempdir().unwrap();
        let config = GraphConfig {
            risk_policy: None,
            graphs: vec![GraphSource::new(dir.path().join("missing.json"))],
        };
        let err = config.load_client().await.unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_load_client_requires_graphs() {
        let err = GraphConfig::default().load_client().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
