//! Release Graph - upgrade path resolution over Cincinnati release graphs.
//!
//! This crate parses one or more update graph documents (usually one per
//! release channel), merges them, and answers release queries: known
//! versions, direct updates, shortest update paths with or without
//! conditional edges, and the risks attached to conditional edges.
//!
//! Fetching graph documents is left to the caller; the library only
//! consumes raw bytes.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod client;
pub mod domain;
pub mod error;
pub mod graph;
pub mod introspect;

// Public CLI module (needed by binary)
pub mod cli;
pub mod config;

// Internal modules (not exposed as public API)
pub(crate) mod output;

pub use client::ReleaseClient;
pub use error::{Error, Result};
pub use introspect::ReleaseIntrospector;
