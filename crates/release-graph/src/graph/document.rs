//! A single parsed graph document.
//!
//! Unconditional edges reference nodes by position in `nodes`, while
//! conditional edges reference nodes by version string. Both encodings are
//! kept as-is; lookups translate between them on demand.

use crate::domain::{ConditionalEdge, ConditionalEdgeGroup, Node, Risk, extend_unique};
use crate::error::{Error, Result};
use serde::Deserialize;

/// Wire shape of a graph document.
#[derive(Deserialize)]
struct RawGraphDocument {
    nodes: Vec<Node>,
    edges: Vec<[usize; 2]>,
    #[serde(default, rename = "conditionalEdges")]
    conditional_edges: Vec<ConditionalEdgeGroup>,
}

/// An immutable, parsed release graph document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<(usize, usize)>,
    conditional_edges: Vec<ConditionalEdgeGroup>,
}

impl GraphDocument {
    /// Parse a graph document from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// - `Error::ParseGraphData` if the bytes are not a JSON document with
    ///   `nodes` and `edges`
    /// - `Error::InvalidEdge` if an edge references a node position that
    ///   does not exist
    pub fn parse(data: &[u8]) -> Result<Self> {
        let raw: RawGraphDocument = serde_json::from_slice(data)?;

        let node_count = raw.nodes.len();
        let edges = raw
            .edges
            .into_iter()
            .enumerate()
            .map(|(index, [from, to])| {
                if from >= node_count || to >= node_count {
                    return Err(Error::InvalidEdge {
                        index,
                        from,
                        to,
                        nodes: node_count,
                    });
                }
                Ok((from, to))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            nodes = node_count,
            edges = edges.len(),
            conditional_groups = raw.conditional_edges.len(),
            "Parsed graph document"
        );

        Ok(Self {
            nodes: raw.nodes,
            edges,
            conditional_edges: raw.conditional_edges,
        })
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All unconditional edges as `(from, to)` node positions.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// All conditional edge groups in declaration order.
    pub fn conditional_edge_groups(&self) -> &[ConditionalEdgeGroup] {
        &self.conditional_edges
    }

    /// The node at `index`, if any.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Position of the first node whose version equals `version` exactly.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReleaseNotFound` if no node carries that version.
    pub fn find_node_index(&self, version: &str) -> Result<usize> {
        self.nodes
            .iter()
            .position(|node| node.version == version)
            .ok_or_else(|| Error::ReleaseNotFound(version.to_string()))
    }

    /// Targets of unconditional edges leaving `index`, in edge order.
    pub fn neighbors_from(&self, index: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == index)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Sources of unconditional edges entering `index`, in edge order.
    pub fn neighbors_to(&self, index: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|(_, to)| *to == index)
            .map(|(from, _)| *from)
            .collect()
    }

    /// Conditional groups restricted to edges leaving the node at `index`.
    ///
    /// Groups with no matching edge are omitted; each returned group keeps
    /// its full risk list.
    pub fn conditional_edges_from(&self, index: usize) -> Vec<ConditionalEdgeGroup> {
        let Some(node) = self.node(index) else {
            return Vec::new();
        };
        self.filter_conditional(|edge| edge.from == node.version)
    }

    /// Conditional groups restricted to edges entering the node at `index`.
    pub fn conditional_edges_to(&self, index: usize) -> Vec<ConditionalEdgeGroup> {
        let Some(node) = self.node(index) else {
            return Vec::new();
        };
        self.filter_conditional(|edge| edge.to == node.version)
    }

    /// Risks declared on the exact conditional edge `from -> to`.
    ///
    /// When the pair appears in several groups, the result is the union of
    /// those groups' risks in first-seen order. An empty result means no
    /// conditional edge was recorded, not that the edge is safe.
    pub fn conditional_risks(&self, from: &str, to: &str) -> Vec<Risk> {
        let mut risks = Vec::new();
        for group in &self.conditional_edges {
            if group.edges.iter().any(|edge| edge.connects(from, to)) {
                extend_unique(&mut risks, &group.risks);
            }
        }
        risks
    }

    fn filter_conditional<F>(&self, keep: F) -> Vec<ConditionalEdgeGroup>
    where
        F: Fn(&ConditionalEdge) -> bool,
    {
        self.conditional_edges
            .iter()
            .filter_map(|group| {
                let edges: Vec<_> = group.edges.iter().filter(|e| keep(e)).cloned().collect();
                (!edges.is_empty()).then(|| ConditionalEdgeGroup {
                    edges,
                    risks: group.risks.clone(),
                })
            })
            .collect()
    }
}
