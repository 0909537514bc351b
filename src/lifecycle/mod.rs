//! Lifecycle Module
//!
//! Drives creation and destruction of a vertex graph.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Factories supplied (explicit and implicit dependencies)
//!    ↓
//! 2. Graph derived (dependencies / dependents)
//!    ↓
//! 3. create: layer by layer, dependencies first   ← VertexFactory::create
//!    ↓
//! [Running...]
//!    ↓
//! 4. Shutdown Signal (SIGTERM/SIGINT)
//!    ↓
//! 5. destroy: layer by layer, dependents first    ← VertexFactory::destroy
//! ```
//!
//! [`DagMaker`] is the core; [`Application`] adds timeouts, optional
//! rollback and signal handling around it.

mod application;
mod error;
mod maker;
mod shutdown;
mod timeout;

pub use application::{Application, ApplicationBuilder};
pub use error::{LifecycleError, Result};
pub use maker::DagMaker;
pub use shutdown::{shutdown_signal, ShutdownHandler};
pub use timeout::TimeoutVertex;
