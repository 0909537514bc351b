//! Dependency graph
//!
//! [`VertexMetadataMap`] derives the full graph (including vertices that are
//! only reachable as dependencies) from a set of factories and orders it into
//! layers in either [`Direction`].

mod metadata;
mod order;

pub use metadata::{VertexMetadata, VertexMetadataMap};
pub use order::{Direction, Layers, Plan};
