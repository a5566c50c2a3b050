//! Merged update graph and shortest path search using petgraph.
//!
//! A [`PathGraph`] is rebuilt from the owned documents for every path
//! request and dropped afterwards. Vertices are version strings matched by
//! exact equality across documents; no semver normalization happens here.
//!
//! # Edge Weights
//!
//! - Unconditional edges always cost 1.
//! - Conditional edges cost [`RiskPolicy::conditional_weight`], which is 1
//!   under `Uniform` and the vertex count under `PreferSafe`.
//!
//! A pair connected by both kinds keeps a single edge of the cheaper kind.

use crate::domain::RiskPolicy;
use crate::error::{Error, Result};
use crate::graph::document::GraphDocument;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Kind of an edge in the merged graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EdgeKind {
    /// Always-available update
    Unconditional,
    /// Update gated by one or more risks
    Conditional,
}

/// Ephemeral merged graph over one or more documents.
pub(crate) struct PathGraph {
    /// Nodes contain version strings, edges contain their kind.
    graph: DiGraph<String, EdgeKind>,

    /// Mapping from version to graph `NodeIndex`.
    vertices: HashMap<String, NodeIndex>,
}

impl PathGraph {
    /// Build the merged graph from `documents`.
    ///
    /// Every node of every document becomes a vertex, and every
    /// unconditional edge becomes an arc. With `include_conditional`, each
    /// conditional edge is added as well; endpoints that no document lists
    /// as a node are added as vertices on the fly.
    pub(crate) fn build(documents: &[GraphDocument], include_conditional: bool) -> Self {
        let mut path_graph = Self {
            graph: DiGraph::new(),
            vertices: HashMap::new(),
        };

        for document in documents {
            for node in document.nodes() {
                path_graph.ensure_vertex(&node.version);
            }
            for &(from, to) in document.edges() {
                let nodes = document.nodes();
                path_graph.add_edge(
                    &nodes[from].version,
                    &nodes[to].version,
                    EdgeKind::Unconditional,
                );
            }
        }

        if include_conditional {
            for document in documents {
                for group in document.conditional_edge_groups() {
                    for edge in &group.edges {
                        path_graph.add_edge(&edge.from, &edge.to, EdgeKind::Conditional);
                    }
                }
            }
        }

        tracing::debug!(
            vertices = path_graph.graph.node_count(),
            edges = path_graph.graph.edge_count(),
            include_conditional,
            "Built merged update graph"
        );

        path_graph
    }

    /// Insert `version` if absent and return its index.
    fn ensure_vertex(&mut self, version: &str) -> NodeIndex {
        if let Some(&index) = self.vertices.get(version) {
            tracing::debug!(version, "Vertex already in graph");
            return index;
        }
        let index = self.graph.add_node(version.to_string());
        self.vertices.insert(version.to_string(), index);
        index
    }

    /// Add `from -> to`, collapsing duplicates onto the cheaper kind.
    fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) {
        let source = self.ensure_vertex(from);
        let target = self.ensure_vertex(to);
        match self.graph.find_edge(source, target) {
            Some(existing) => {
                let weight = &mut self.graph[existing];
                if kind < *weight {
                    *weight = kind;
                }
            }
            None => {
                self.graph.add_edge(source, target, kind);
            }
        }
    }

    /// Number of vertices in the merged graph.
    pub(crate) fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if `version` is a vertex.
    #[cfg(test)]
    pub(crate) fn contains(&self, version: &str) -> bool {
        self.vertices.contains_key(version)
    }

    /// Lowest-cost path from `from` to `to` under `policy`.
    ///
    /// Returns the visited versions including both endpoints. A request
    /// from a vertex to itself yields the single-element path.
    ///
    /// # Errors
    ///
    /// - `Error::VertexNotFound` if either endpoint is not a vertex
    /// - `Error::UpdatePathNotFound` if `to` is unreachable from `from`
    pub(crate) fn shortest_path(
        &self,
        from: &str,
        to: &str,
        policy: RiskPolicy,
    ) -> Result<Vec<String>> {
        let start = *self
            .vertices
            .get(from)
            .ok_or_else(|| Error::VertexNotFound(from.to_string()))?;
        let goal = *self
            .vertices
            .get(to)
            .ok_or_else(|| Error::VertexNotFound(to.to_string()))?;

        let conditional_weight = policy.conditional_weight(self.vertex_count());

        // A* with a zero heuristic is Dijkstra that also yields the path.
        let (cost, path) = algo::astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| match *edge.weight() {
                EdgeKind::Unconditional => 1,
                EdgeKind::Conditional => conditional_weight,
            },
            |_| 0u64,
        )
        .ok_or_else(|| Error::UpdatePathNotFound {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        tracing::debug!(from, to, cost, hops = path.len().saturating_sub(1), "Found update path");

        Ok(path
            .into_iter()
            .map(|index| self.graph[index].clone())
            .collect())
    }
}
