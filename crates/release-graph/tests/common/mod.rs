//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use release_graph::ReleaseClient;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Graph document for the 4.19 channels.
pub const GRAPH_419: &str = "ocp-graph-4.19-amd64.json";

/// Graph document for the 4.20 channels.
pub const GRAPH_420: &str = "ocp-graph-4.20-amd64.json";

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw bytes of a fixture document.
pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("Failed to read fixture")
}

/// Client over the 4.19 document only.
pub fn client_419() -> ReleaseClient {
    ReleaseClient::new([fixture(GRAPH_419)]).expect("Failed to parse 4.19 graph")
}

/// Client over both channel documents.
pub fn client_419_420() -> ReleaseClient {
    ReleaseClient::new([fixture(GRAPH_419), fixture(GRAPH_420)])
        .expect("Failed to parse graphs")
}

/// Parse a version, panicking on invalid input.
pub fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// Parse a list of versions.
pub fn versions(list: &[&str]) -> Vec<Version> {
    list.iter().map(|s| v(s)).collect()
}

/// Run the release-graph binary in `dir` with colors disabled.
pub fn run_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_release-graph"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute release-graph binary")
}
