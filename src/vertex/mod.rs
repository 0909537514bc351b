//! Vertex factories
//!
//! A vertex is declared by a [`VertexFactory`]: a name, the factories it
//! depends on, and asynchronous `create` / `destroy` operations. Built values
//! travel through the graph as type-erased [`Instance`] handles.

mod builder;
mod factory;
mod options;

pub use builder::{FnVertex, FnVertexBuilder};
pub use factory::{Dependencies, Instance, SharedFactory, VertexFactory};
pub use options::VertexOptions;
