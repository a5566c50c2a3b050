//! Release graph query interface.
//!
//! [`ReleaseIntrospector`] is the capability callers program against.
//! [`ReleaseClient`](crate::client::ReleaseClient) is the real
//! implementation; [`MockIntrospector`] is a fixed two-release stand-in for
//! tests.
//!
//! # Test Utilities
//!
//! Enable the `test-util` feature to use [`MockIntrospector`] from
//! downstream crates:
//!
//! ```toml
//! [dev-dependencies]
//! release-graph = { version = "...", features = ["test-util"] }
//! ```

#[cfg(any(test, feature = "test-util"))]
use crate::domain::parse_version;
use crate::domain::{Metadata, Risk};
#[cfg(any(test, feature = "test-util"))]
use crate::error::Error;
use crate::error::Result;
use semver::Version;

/// Queries over one or more release graphs.
///
/// Implementations must be `Send + Sync`; all methods take `&self` and
/// never mutate the underlying graphs.
///
/// # Error Handling
///
/// - `ReleaseNotFound`: version absent from every graph
/// - `VertexNotFound`: path endpoint absent from the merged graph
/// - `UpdatePathNotFound`: endpoints exist but are not connected
/// - `ConditionalEdgeNotFound`: no risks recorded for the pair
pub trait ReleaseIntrospector: Send + Sync {
    /// All known releases, deduplicated and sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidVersion` if any node version is not semver.
    fn releases(&self) -> Result<Vec<Version>>;

    /// Payload locator of `version`.
    fn payload(&self, version: &Version) -> Result<String>;

    /// Metadata of `version`.
    fn metadata(&self, version: &Version) -> Result<Metadata>;

    /// Releases reachable from `from` through one unconditional edge.
    fn updates_from(&self, from: &Version) -> Result<Vec<Version>>;

    /// Releases that reach `to` through one unconditional edge.
    fn updates_to(&self, to: &Version) -> Result<Vec<Version>>;

    /// Shortest path from `from` to `to` over unconditional edges only.
    fn update_path(&self, from: &Version, to: &Version) -> Result<Vec<Version>>;

    /// Shortest path that may also traverse conditional edges.
    fn update_path_with_risks(&self, from: &Version, to: &Version) -> Result<Vec<Version>>;

    /// Risks declared on the conditional edge `from -> to`.
    fn risks(&self, from: &Version, to: &Version) -> Result<Vec<Risk>>;
}

// ========== Test Utilities ==========

/// Source release known to [`MockIntrospector`].
#[cfg(any(test, feature = "test-util"))]
pub const MOCK_FROM_VERSION: &str = "4.19.0";

/// Target release known to [`MockIntrospector`].
#[cfg(any(test, feature = "test-util"))]
pub const MOCK_TO_VERSION: &str = "4.19.1";

/// Mock implementation of [`ReleaseIntrospector`] for testing.
///
/// This is a **stateless** mock describing a graph with exactly two
/// releases, [`MOCK_FROM_VERSION`] and [`MOCK_TO_VERSION`], joined by a
/// single conditional edge carrying [`MockIntrospector::mock_risk`].
///
/// # Behavior
///
/// - `releases`: both versions
/// - `payload`, `metadata`: known for both versions, `ReleaseNotFound` otherwise
/// - `updates_from`, `updates_to`: always empty for known versions
/// - `update_path`: reflexive path only, `UpdatePathNotFound` otherwise
/// - `update_path_with_risks`: crosses the conditional edge
/// - `risks`: the mock risk for the one edge
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct MockIntrospector;

#[cfg(any(test, feature = "test-util"))]
impl MockIntrospector {
    /// Create a new `MockIntrospector` instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The risk attached to the mock conditional edge.
    #[must_use]
    pub fn mock_risk() -> Risk {
        Risk {
            url: "https://example.com/risks/mock".to_string(),
            name: "MockRisk".to_string(),
            message: "Mock conditional update".to_string(),
        }
    }

    fn known(version: &Version) -> Result<String> {
        let version = version.to_string();
        if version == MOCK_FROM_VERSION || version == MOCK_TO_VERSION {
            Ok(version)
        } else {
            Err(Error::ReleaseNotFound(version))
        }
    }

    fn vertex(version: &Version) -> Result<String> {
        Self::known(version).map_err(|_| Error::VertexNotFound(version.to_string()))
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for MockIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl ReleaseIntrospector for MockIntrospector {
    fn releases(&self) -> Result<Vec<Version>> {
        [MOCK_FROM_VERSION, MOCK_TO_VERSION]
            .into_iter()
            .map(parse_version)
            .collect()
    }

    fn payload(&self, version: &Version) -> Result<String> {
        Self::known(version).map(|v| format!("quay.io/mock/release@{v}"))
    }

    fn metadata(&self, version: &Version) -> Result<Metadata> {
        Self::known(version)?;
        Ok(Metadata::from([("mock".to_string(), "true".to_string())]))
    }

    fn updates_from(&self, from: &Version) -> Result<Vec<Version>> {
        Self::known(from)?;
        Ok(Vec::new())
    }

    fn updates_to(&self, to: &Version) -> Result<Vec<Version>> {
        Self::known(to)?;
        Ok(Vec::new())
    }

    fn update_path(&self, from: &Version, to: &Version) -> Result<Vec<Version>> {
        let (start, goal) = (Self::vertex(from)?, Self::vertex(to)?);
        if start == goal {
            Ok(vec![from.clone()])
        } else {
            Err(Error::UpdatePathNotFound {
                from: start,
                to: goal,
            })
        }
    }

    fn update_path_with_risks(&self, from: &Version, to: &Version) -> Result<Vec<Version>> {
        let (start, goal) = (Self::vertex(from)?, Self::vertex(to)?);
        match (start.as_str(), goal.as_str()) {
            (a, b) if a == b => Ok(vec![from.clone()]),
            (MOCK_FROM_VERSION, MOCK_TO_VERSION) => Ok(vec![from.clone(), to.clone()]),
            _ => Err(Error::UpdatePathNotFound {
                from: start,
                to: goal,
            }),
        }
    }

    fn risks(&self, from: &Version, to: &Version) -> Result<Vec<Risk>> {
        let (from, to) = (from.to_string(), to.to_string());
        if from == MOCK_FROM_VERSION && to == MOCK_TO_VERSION {
            Ok(vec![Self::mock_risk()])
        } else {
            Err(Error::ConditionalEdgeNotFound { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_trait_object_usage() {
        let introspector: Box<dyn ReleaseIntrospector> = Box::new(MockIntrospector::new());
        let releases = introspector.releases().unwrap();
        assert_eq!(releases, vec![v(MOCK_FROM_VERSION), v(MOCK_TO_VERSION)]);
    }

    #[test]
    fn test_mock_paths() {
        let mock = MockIntrospector::new();
        let (from, to) = (v(MOCK_FROM_VERSION), v(MOCK_TO_VERSION));

        let err = mock.update_path(&from, &to).unwrap_err();
        assert!(matches!(err, Error::UpdatePathNotFound { .. }));

        let path = mock.update_path_with_risks(&from, &to).unwrap();
        assert_eq!(path, vec![from.clone(), to.clone()]);
        assert_eq!(mock.risks(&from, &to).unwrap(), vec![MockIntrospector::mock_risk()]);

        let err = mock.update_path(&v("9.9.9"), &to).unwrap_err();
        assert!(matches!(err, Error::VertexNotFound(_)));
    }

    #[test]
    fn test_mock_unknown_release() {
        let mock = MockIntrospector::new();
        assert!(mock.payload(&v("4.20.0")).unwrap_err().is_not_found());
        assert!(mock.updates_from(&v("4.20.0")).unwrap_err().is_not_found());
    }
}
