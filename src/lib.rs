//! # dag-maker
//!
//! Builds and tears down graphs of interdependent, asynchronously constructed
//! components in dependency order.
//!
//! Every component is a vertex declared by a [`VertexFactory`]: a unique name,
//! the factories it depends on and asynchronous `create` / `destroy`
//! operations. [`DagMaker`] derives the graph (including dependencies that were
//! never registered explicitly), orders it into layers and walks them:
//! dependencies before dependents on creation, dependents before dependencies
//! on destruction.
//!
//! ## Features
//!
//! - **Implicit vertices**: registering a vertex registers everything it depends on
//! - **Deterministic layers**: vertices inside a layer are sorted by name
//! - **Cycle detection**: ordering fails instead of hanging
//! - **Typed injection**: dependencies arrive as type-erased handles with checked downcasts
//! - **Application bootstrap**: timeouts, rollback and signal-driven shutdown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dag_maker::prelude::*;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     database: Arc<Database>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = FnVertex::builder("Database")
//!         .on_create(|_| async {
//!             Ok(Database {
//!                 url: "postgres://localhost".to_string(),
//!             })
//!         })
//!         .build();
//!
//!     let users = FnVertex::builder("UserService")
//!         .depends_on("database", database)
//!         .on_create(|options| async move {
//!             Ok::<_, BoxError>(UserService {
//!                 database: options.get::<Database>("database")?,
//!             })
//!         })
//!         .build();
//!
//!     // Database is created implicitly, before UserService
//!     let maker = DagMaker::new([users]);
//!     let dag = maker.create().await?;
//!
//!     let service = dag.resolve::<UserService>("UserService")?;
//!     println!("connected to {}", service.database.url);
//!
//!     maker.destroy(&dag).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dag;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod vertex;

// Re-export core types
pub use dag::Dag;
pub use error::{BoxError, DagError, Result};
pub use graph::{Direction, Layers, Plan, VertexMetadata, VertexMetadataMap};
pub use lifecycle::DagMaker;
pub use vertex::{
    Dependencies, FnVertex, FnVertexBuilder, Instance, SharedFactory, VertexFactory,
    VertexOptions,
};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use dag_maker::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, LifecycleConfig};
    pub use crate::dag::Dag;
    pub use crate::error::{BoxError, DagError};
    pub use crate::graph::{Direction, Layers, Plan};
    pub use crate::lifecycle::{
        Application, ApplicationBuilder, DagMaker, LifecycleError, ShutdownHandler,
        TimeoutVertex, shutdown_signal,
    };
    pub use crate::vertex::{
        Dependencies, FnVertex, FnVertexBuilder, Instance, SharedFactory, VertexFactory,
        VertexOptions,
    };
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
