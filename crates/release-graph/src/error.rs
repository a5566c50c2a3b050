//! Error types for release graph operations.
//!
//! Errors fall into three families:
//!
//! - **Parse failures**: a graph document is not well-formed
//!   ([`Error::ParseGraphData`], [`Error::InvalidEdge`]).
//! - **Not found**: a release, update path, or conditional edge is absent
//!   ([`Error::ReleaseNotFound`], [`Error::UpdatePathNotFound`],
//!   [`Error::ConditionalEdgeNotFound`]). Use [`Error::is_not_found`] to
//!   match the whole family.
//! - **Vertex not found**: a path endpoint is missing from the merged
//!   graph ([`Error::VertexNotFound`]). This is deliberately kept apart from
//!   the not-found family so callers can tell "no such release" from
//!   "release exists but cannot be reached".

use std::io;
use thiserror::Error;

/// The error type for release graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph document is not valid JSON or does not match the schema.
    #[error("cannot parse graph data: {0}")]
    ParseGraphData(#[from] serde_json::Error),

    /// An unconditional edge points outside the document's node list.
    #[error("cannot parse graph data: edge {index} ({from} -> {to}) references a node outside 0..{nodes}")]
    InvalidEdge {
        /// Position of the offending entry in `edges`.
        index: usize,
        /// Source node position.
        from: usize,
        /// Destination node position.
        to: usize,
        /// Number of nodes in the document.
        nodes: usize,
    },

    /// The release is not a node in any graph document.
    #[error("release {0:?} not found")]
    ReleaseNotFound(String),

    /// A path endpoint is not a vertex of the merged update graph.
    #[error("vertex {0:?} not found in update graph")]
    VertexNotFound(String),

    /// Both endpoints exist but no sequence of edges connects them.
    #[error("update path from {from} to {to} not found")]
    UpdatePathNotFound {
        /// Requested source release.
        from: String,
        /// Requested target release.
        to: String,
    },

    /// No conditional edge for the pair was recorded in any document.
    #[error("conditional edge {from} -> {to} not found")]
    ConditionalEdgeNotFound {
        /// Edge source release.
        from: String,
        /// Edge target release.
        to: String,
    },

    /// A node version is not valid semantic version syntax.
    #[error("invalid release version {version:?}: {source}")]
    InvalidVersion {
        /// The offending version string.
        version: String,
        /// Underlying parse failure.
        #[source]
        source: semver::Error,
    },

    /// IO error while loading graph documents or configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` for every "not found" condition except a missing
    /// path vertex.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReleaseNotFound(_)
                | Self::UpdatePathNotFound { .. }
                | Self::ConditionalEdgeNotFound { .. }
        )
    }

    /// Returns `true` when a graph document could not be parsed.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::ParseGraphData(_) | Self::InvalidEdge { .. })
    }
}

/// A specialized Result type for release graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::release(Error::ReleaseNotFound("4.19.0".into()), true)]
    #[case::path(Error::UpdatePathNotFound { from: "a".into(), to: "b".into() }, true)]
    #[case::conditional(Error::ConditionalEdgeNotFound { from: "a".into(), to: "b".into() }, true)]
    #[case::vertex(Error::VertexNotFound("4.21.1".into()), false)]
    #[case::config(Error::Config("bad".into()), false)]
    fn test_is_not_found(#[case] err: Error, #[case] expected: bool) {
        assert_eq!(err.is_not_found(), expected);
    }

    #[test]
    fn test_parse_failures_are_not_not_found() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.is_parse_failure());
        assert!(!err.is_not_found());

        let edge_err = Error::InvalidEdge {
            index: 0,
            from: 0,
            to: 9,
            nodes: 2,
        };
        assert!(edge_err.is_parse_failure());
        assert!(edge_err.to_string().contains("0..2"));
    }
}
