//! Multi-document release client.
//!
//! [`ReleaseClient`] owns one [`GraphDocument`] per fetched graph (typically
//! one per channel) and answers queries across all of them:
//!
//! - Node queries (payload, metadata) return the first document's answer.
//! - Neighbor queries union every document that contains the version and
//!   only fail when no document does.
//! - Path queries run over a merged graph rebuilt for each request.
//!
//! # Example
//!
//! ```
//! use release_graph::client::ReleaseClient;
//! use release_graph::introspect::ReleaseIntrospector;
//! use semver::Version;
//!
//! let data = br#"{
//!     "nodes": [
//!         {"version": "4.19.0", "payload": "quay.io/release@sha256:00"},
//!         {"version": "4.19.1", "payload": "quay.io/release@sha256:01"}
//!     ],
//!     "edges": [[0, 1]]
//! }"#;
//!
//! let client = ReleaseClient::new([data.as_slice()])?;
//! let path = client.update_path(&Version::new(4, 19, 0), &Version::new(4, 19, 1))?;
//! assert_eq!(path.len(), 2);
//! # Ok::<(), release_graph::Error>(())
//! ```

use crate::domain::{
    ConditionalUpdate, Metadata, Node, Risk, RiskPolicy, extend_unique, parse_version,
};
use crate::error::{Error, Result};
use crate::graph::document::GraphDocument;
use crate::graph::path::PathGraph;
use crate::introspect::ReleaseIntrospector;
use petgraph::Direction;
use semver::Version;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::Span;

/// Release graph queries over one or more graph documents.
///
/// Documents are supplied once at construction and never mutated, so a
/// client can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    documents: Vec<GraphDocument>,
    risk_policy: RiskPolicy,
    span: Span,
}

impl ReleaseClient {
    /// Parse every raw document and build a client over them.
    ///
    /// Construction is all-or-nothing: the first document that fails to
    /// parse aborts the whole client.
    ///
    /// # Errors
    ///
    /// Returns a parse failure (`Error::ParseGraphData` or
    /// `Error::InvalidEdge`) for the first malformed document.
    pub fn new<I, B>(datas: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let documents = datas
            .into_iter()
            .enumerate()
            .map(|(position, data)| {
                GraphDocument::parse(data.as_ref()).inspect_err(|e| {
                    tracing::warn!(document = position, error = %e, "Rejecting graph document");
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_documents(documents))
    }

    /// Build a client over already-parsed documents.
    pub fn from_documents(documents: Vec<GraphDocument>) -> Self {
        let span = tracing::debug_span!("release_graph", documents = documents.len());
        tracing::debug!(parent: &span, "Created release client");
        Self {
            documents,
            risk_policy: RiskPolicy::default(),
            span,
        }
    }

    /// Set how conditional edges are weighted by
    /// [`update_path_with_risks`](ReleaseIntrospector::update_path_with_risks).
    #[must_use]
    pub fn with_risk_policy(mut self, risk_policy: RiskPolicy) -> Self {
        self.risk_policy = risk_policy;
        self
    }

    /// Replace the span every query is recorded under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The owned documents in insertion order.
    pub fn documents(&self) -> &[GraphDocument] {
        &self.documents
    }

    /// The active risk policy.
    pub fn risk_policy(&self) -> RiskPolicy {
        self.risk_policy
    }

    /// Conditional updates leaving `from`, across every document that lists
    /// `from` as a node. Sorted by target version.
    ///
    /// # Errors
    ///
    /// - `Error::ReleaseNotFound` if no document contains `from`
    /// - `Error::InvalidVersion` if a target is not semver
    pub fn conditional_updates_from(&self, from: &Version) -> Result<Vec<ConditionalUpdate>> {
        self.conditional_updates(from, Direction::Outgoing)
    }

    /// Conditional updates entering `to`. Sorted by source version.
    ///
    /// # Errors
    ///
    /// Same as [`conditional_updates_from`](Self::conditional_updates_from).
    pub fn conditional_updates_to(&self, to: &Version) -> Result<Vec<ConditionalUpdate>> {
        self.conditional_updates(to, Direction::Incoming)
    }

    fn find_node(&self, version: &Version) -> Result<&Node> {
        let version = version.to_string();
        self.documents
            .iter()
            .find_map(|document| {
                document
                    .find_node_index(&version)
                    .ok()
                    .and_then(|index| document.node(index))
            })
            .ok_or(Error::ReleaseNotFound(version))
    }

    fn direct_updates(&self, version: &Version, direction: Direction) -> Result<Vec<Version>> {
        let _entered = self.span.enter();
        let version = version.to_string();

        let mut neighbors = HashSet::new();
        let mut misses = 0;
        for document in &self.documents {
            let Ok(index) = document.find_node_index(&version) else {
                misses += 1;
                continue;
            };
            let indices = match direction {
                Direction::Outgoing => document.neighbors_from(index),
                Direction::Incoming => document.neighbors_to(index),
            };
            neighbors.extend(
                indices
                    .into_iter()
                    .filter_map(|i| document.node(i))
                    .map(|node| node.version.as_str()),
            );
        }

        // Node not found in any of the documents
        if misses == self.documents.len() {
            tracing::debug!(%version, ?direction, "Release not in any graph");
            return Err(Error::ReleaseNotFound(version));
        }

        tracing::debug!(
            %version,
            ?direction,
            updates = neighbors.len(),
            missing_from = misses,
            "Collected direct updates"
        );
        sorted_versions(neighbors)
    }

    fn conditional_updates(
        &self,
        version: &Version,
        direction: Direction,
    ) -> Result<Vec<ConditionalUpdate>> {
        let _entered = self.span.enter();
        let version = version.to_string();

        let mut merged: HashMap<(String, String), Vec<Risk>> = HashMap::new();
        let mut found = false;
        for document in &self.documents {
            let Ok(index) = document.find_node_index(&version) else {
                continue;
            };
            found = true;
            let groups = match direction {
                Direction::Outgoing => document.conditional_edges_from(index),
                Direction::Incoming => document.conditional_edges_to(index),
            };
            for group in groups {
                for edge in group.edges {
                    let risks = merged.entry((edge.from, edge.to)).or_default();
                    extend_unique(risks, &group.risks);
                }
            }
        }

        if !found {
            return Err(Error::ReleaseNotFound(version));
        }

        let mut updates = merged
            .into_iter()
            .map(|((from, to), risks)| -> Result<(Version, ConditionalUpdate)> {
                let other = match direction {
                    Direction::Outgoing => &to,
                    Direction::Incoming => &from,
                };
                let key = parse_version(other)?;
                Ok((key, ConditionalUpdate { from, to, risks }))
            })
            .collect::<Result<Vec<_>>>()?;
        updates.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(updates.into_iter().map(|(_, update)| update).collect())
    }

    fn resolve_path(
        &self,
        from: &Version,
        to: &Version,
        include_conditional: bool,
    ) -> Result<Vec<Version>> {
        let _entered = self.span.enter();
        let graph = PathGraph::build(&self.documents, include_conditional);
        let path = graph
            .shortest_path(&from.to_string(), &to.to_string(), self.risk_policy)
            .inspect_err(|e| {
                tracing::debug!(%from, %to, include_conditional, error = %e, "No update path");
            })?;
        path.iter().map(|v| parse_version(v)).collect()
    }
}

impl ReleaseIntrospector for ReleaseClient {
    fn releases(&self) -> Result<Vec<Version>> {
        let _entered = self.span.enter();
        let versions: HashSet<&str> = self
            .documents
            .iter()
            .flat_map(GraphDocument::nodes)
            .map(|node| node.version.as_str())
            .collect();
        sorted_versions(versions)
    }

    fn payload(&self, version: &Version) -> Result<String> {
        let _entered = self.span.enter();
        self.find_node(version).map(|node| node.payload.clone())
    }

    fn metadata(&self, version: &Version) -> Result<Metadata> {
        let _entered = self.span.enter();
        self.find_node(version).map(|node| node.metadata.clone())
    }

    fn updates_from(&self, from: &Version) -> Result<Vec<Version>> {
        self.direct_updates(from, Direction::Outgoing)
    }

    fn updates_to(&self, to: &Version) -> Result<Vec<Version>> {
        self.direct_updates(to, Direction::Incoming)
    }

    fn update_path(&self, from: &Version, to: &Version) -> Result<Vec<Version>> {
        self.resolve_path(from, to, false)
    }

    fn update_path_with_risks(&self, from: &Version, to: &Version) -> Result<Vec<Version>> {
        self.resolve_path(from, to, true)
    }

    fn risks(&self, from: &Version, to: &Version) -> Result<Vec<Risk>> {
        let _entered = self.span.enter();
        let (from, to) = (from.to_string(), to.to_string());

        let mut risks = Vec::new();
        for document in &self.documents {
            extend_unique(&mut risks, &document.conditional_risks(&from, &to));
        }

        if risks.is_empty() {
            return Err(Error::ConditionalEdgeNotFound { from, to });
        }
        Ok(risks)
    }
}

/// Parse, deduplicate and sort version strings.
fn sorted_versions<'a, I>(versions: I) -> Result<Vec<Version>>
where
    I: IntoIterator<Item = &'a str>,
{
    let sorted = versions
        .into_iter()
        .map(parse_version)
        .collect::<Result<BTreeSet<_>>>()?;
    Ok(sorted.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    const FIRST: &str = r#"{
        "nodes": [
            {"version": "1.0.0", "payload": "first-1.0.0", "metadata": {"source": "first"}},
            {"version": "1.1.0", "payload": "first-1.1.0"}
        ],
        "edges": [[0, 1]],
        "conditionalEdges": [{
            "edges": [{"from": "1.0.0", "to": "1.2.0"}],
            "risks": [{"url": "u1", "name": "R1", "message": "m1"}]
        }]
    }"#;

    const SECOND: &str = r#"{
        "nodes": [
            {"version": "1.0.0", "payload": "second-1.0.0", "metadata": {"source": "second"}},
            {"version": "1.2.0", "payload": "second-1.2.0"},
            {"version": "2.0.0", "payload": "second-2.0.0"}
        ],
        "edges": [[1, 2]],
        "conditionalEdges": [{
            "edges": [{"from": "1.0.0", "to": "1.2.0"}],
            "risks": [
                {"url": "u1", "name": "R1", "message": "m1"},
                {"url": "u2", "name": "R2", "message": "m2"}
            ]
        }]
    }"#;

    #[fixture]
    fn client() -> ReleaseClient {
        ReleaseClient::new([FIRST, SECOND]).unwrap()
    }

    #[rstest]
    fn test_releases_union_sorted(client: ReleaseClient) {
        assert_eq!(
            client.releases().unwrap(),
            vec![v("1.0.0"), v("1.1.0"), v("1.2.0"), v("2.0.0")]
        );
    }

    #[rstest]
    fn test_payload_and_metadata_first_document_wins(client: ReleaseClient) {
        assert_eq!(client.payload(&v("1.0.0")).unwrap(), "first-1.0.0");
        assert_eq!(client.metadata(&v("1.0.0")).unwrap()["source"], "first");
        assert_eq!(client.payload(&v("2.0.0")).unwrap(), "second-2.0.0");
    }

    #[rstest]
    fn test_partial_absence_is_not_an_error(client: ReleaseClient) {
        // 1.1.0 only exists in the first document.
        assert_eq!(client.updates_to(&v("1.1.0")).unwrap(), vec![v("1.0.0")]);
        // 1.0.0 exists in both but only has outgoing edges in the first.
        assert_eq!(client.updates_from(&v("1.0.0")).unwrap(), vec![v("1.1.0")]);
    }

    #[rstest]
    #[case::payload("payload")]
    #[case::metadata("metadata")]
    #[case::updates_from("updates_from")]
    #[case::updates_to("updates_to")]
    fn test_missing_everywhere(client: ReleaseClient, #[case] query: &str) {
        let missing = v("9.9.9");
        let err = match query {
            "payload" => client.payload(&missing).map(|_| ()),
            "metadata" => client.metadata(&missing).map(|_| ()),
            "updates_from" => client.updates_from(&missing).map(|_| ()),
            _ => client.updates_to(&missing).map(|_| ()),
        }
        .unwrap_err();
        assert!(matches!(err, Error::ReleaseNotFound(ref s) if s == "9.9.9"));
    }

    #[test]
    fn test_empty_client() {
        let client = ReleaseClient::new(Vec::<&[u8]>::new()).unwrap();
        assert!(client.releases().unwrap().is_empty());
        assert!(client.updates_from(&v("1.0.0")).unwrap_err().is_not_found());
        assert!(matches!(
            client.update_path(&v("1.0.0"), &v("1.0.0")).unwrap_err(),
            Error::VertexNotFound(_)
        ));
    }

    #[test]
    fn test_construction_is_all_or_nothing() {
        let err = ReleaseClient::new([FIRST, "{broken"]).unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[rstest]
    fn test_risks_deduplicated_across_documents(client: ReleaseClient) {
        let names: Vec<_> = client
            .risks(&v("1.0.0"), &v("1.2.0"))
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["R1", "R2"]);
    }

    #[rstest]
    fn test_risks_ignore_unconditional_edges(client: ReleaseClient) {
        let err = client.risks(&v("1.0.0"), &v("1.1.0")).unwrap_err();
        assert!(matches!(err, Error::ConditionalEdgeNotFound { .. }));
    }

    #[rstest]
    fn test_conditional_updates_from(client: ReleaseClient) {
        let updates = client.conditional_updates_from(&v("1.0.0")).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].to, "1.2.0");
        assert_eq!(updates[0].risks.len(), 2);
    }

    #[rstest]
    fn test_conditional_updates_to(client: ReleaseClient) {
        let updates = client.conditional_updates_to(&v("1.2.0")).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].from, "1.0.0");

        assert!(client.conditional_updates_to(&v("1.1.0")).unwrap().is_empty());
        assert!(
            client
                .conditional_updates_to(&v("3.0.0"))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[rstest]
    fn test_path_modes(client: ReleaseClient) {
        let err = client.update_path(&v("1.0.0"), &v("2.0.0")).unwrap_err();
        assert!(matches!(err, Error::UpdatePathNotFound { .. }));

        let path = client
            .update_path_with_risks(&v("1.0.0"), &v("2.0.0"))
            .unwrap();
        assert_eq!(path, vec![v("1.0.0"), v("1.2.0"), v("2.0.0")]);
    }

    #[test]
    fn test_invalid_version_propagates() {
        let doc = r#"{"nodes": [{"version": "not-a-version", "payload": ""}], "edges": []}"#;
        let client = ReleaseClient::new([doc]).unwrap();
        let err = client.releases().unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
    }

    #[test]
    fn test_builder_knobs() {
        let client = ReleaseClient::from_documents(Vec::new())
            .with_risk_policy(RiskPolicy::Uniform)
            .with_span(tracing::info_span!("custom"));
        assert_eq!(client.risk_policy(), RiskPolicy::Uniform);
        assert!(client.documents().is_empty());
    }
}
