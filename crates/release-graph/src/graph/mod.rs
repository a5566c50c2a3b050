//! Graph storage and algorithms.
//!
//! - [`document`]: one parsed Cincinnati graph document
//! - `path`: the merged, weighted graph used for shortest path queries

pub mod document;
pub(crate) mod path;

pub use document::GraphDocument;
