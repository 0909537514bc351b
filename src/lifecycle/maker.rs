//! DAG Maker
//!
//! Creates and destroys every vertex of a graph in dependency order.

use crate::dag::Dag;
use crate::error::{DagError, Result};
use crate::graph::{Direction, Layers, Plan, VertexMetadataMap};
use crate::vertex::{Instance, SharedFactory, VertexOptions};

/// Builds and tears down a graph of vertices
///
/// The graph is derived once from the supplied factories, including every
/// factory that is only reachable as a dependency. Creation walks the layers of
/// [`Direction::Dependencies`], destruction those of [`Direction::Dependents`].
/// Both walks are sequential: one factory operation at a time, layer by layer,
/// names in lexicographic order inside a layer.
///
/// # Example
///
/// ```rust,ignore
/// use dag_maker::prelude::*;
///
/// let maker = DagMaker::new([api]);  // Config, Database and Cache are implicit
///
/// let dag = maker.create().await?;
/// let api = dag.resolve::<Api>("Api")?;
/// // ... application runs ...
/// maker.destroy(&dag).await?;
/// ```
pub struct DagMaker {
    metadata: VertexMetadataMap,
}

impl DagMaker {
    /// Create a new DagMaker from the given vertex factories
    pub fn new<I>(factories: I) -> Self
    where
        I: IntoIterator<Item = SharedFactory>,
    {
        Self {
            metadata: VertexMetadataMap::from_factories(factories),
        }
    }

    /// The graph this maker operates on
    pub fn metadata(&self) -> &VertexMetadataMap {
        &self.metadata
    }

    /// Order vertex names by dependencies or dependents, grouped by layer
    pub fn order_by(&self, direction: Direction) -> Result<Layers> {
        self.metadata.order_by(direction)
    }

    /// Creation and destruction order
    pub fn plan(&self) -> Result<Plan> {
        self.metadata.plan()
    }

    /// Create every vertex in dependencies order
    ///
    /// # Errors
    ///
    /// Fails on a dependency cycle or on the first factory that fails. The
    /// vertices created so far are dropped without being destroyed; use
    /// [`create_into`](Self::create_into) to keep hold of them.
    pub async fn create(&self) -> Result<Dag> {
        let mut dag = Dag::new();
        self.create_into(&mut dag).await?;
        Ok(dag)
    }

    /// Create every vertex missing from `dag` in dependencies order
    ///
    /// Vertices already present in `dag` are kept as they are, so a map left
    /// behind by a failed call can be completed by calling this again.
    pub async fn create_into(&self, dag: &mut Dag) -> Result<()> {
        let layers = self.order_by(Direction::Dependencies)?;
        tracing::info!(
            "Creating {} vertices in {} layers...",
            self.metadata.len(),
            layers.len()
        );

        let mut created = 0;
        for name in layers.iter().flatten() {
            if dag.contains(name) {
                tracing::debug!("Already created: {}", name);
                continue;
            }
            let Some(metadata) = self.metadata.get(name) else {
                continue;
            };
            let factory = metadata.factory();

            let mut options = VertexOptions::new();
            for (local, dependency) in factory.dependencies() {
                let instance =
                    dag.get(dependency.name())
                        .ok_or_else(|| DagError::VertexNotFound {
                            name: dependency.name().to_string(),
                        })?;
                options.insert(local, instance.clone());
            }

            tracing::debug!("Creating: {}", name);
            let instance =
                factory
                    .create(options)
                    .await
                    .map_err(|source| DagError::CreateFailed {
                        vertex: name.clone(),
                        source,
                    })?;
            dag.insert(name.clone(), instance);
            created += 1;
            tracing::debug!("Created: {}", name);
        }

        tracing::info!("Create complete ({} vertices created)", created);
        Ok(())
    }

    /// Destroy the vertices of `dag` in dependents order
    ///
    /// Vertices of the graph that are missing from `dag` are skipped. The map
    /// itself is left untouched; use [`destroy_from`](Self::destroy_from) to
    /// drop each vertex from it as it is destroyed.
    ///
    /// # Errors
    ///
    /// `dag` is checked for vertices this maker does not know before any
    /// teardown starts, so that failure destroys nothing. A dependency cycle
    /// fails the same way. Otherwise fails on the first factory that fails,
    /// leaving the remaining vertices alive.
    pub async fn destroy(&self, dag: &Dag) -> Result<()> {
        let layers = self.destroy_order(dag)?;

        let mut destroyed = 0;
        for name in layers.iter().flatten() {
            let Some(instance) = dag.get(name) else {
                tracing::debug!("Not created, skipping: {}", name);
                continue;
            };
            self.destroy_vertex(name, instance.clone()).await?;
            destroyed += 1;
        }

        tracing::info!("Destroy complete ({} vertices destroyed)", destroyed);
        Ok(())
    }

    /// Destroy the vertices of `dag` in dependents order, removing each one
    /// once its destroy succeeded
    ///
    /// After a failure `dag` holds exactly the vertices that are still alive,
    /// so calling this again never destroys a vertex twice. On success `dag`
    /// is empty.
    pub async fn destroy_from(&self, dag: &mut Dag) -> Result<()> {
        let layers = self.destroy_order(dag)?;

        let mut destroyed = 0;
        for name in layers.iter().flatten() {
            let Some(instance) = dag.get(name).cloned() else {
                tracing::debug!("Not created, skipping: {}", name);
                continue;
            };
            self.destroy_vertex(name, instance).await?;
            dag.remove(name);
            destroyed += 1;
        }

        tracing::info!("Destroy complete ({} vertices destroyed)", destroyed);
        Ok(())
    }

    fn destroy_order(&self, dag: &Dag) -> Result<Layers> {
        if let Some(unknown) = dag.names().find(|name| !self.metadata.contains(name)) {
            return Err(DagError::VertexFactoryNotFound {
                name: unknown.to_string(),
            });
        }

        let layers = self.order_by(Direction::Dependents)?;
        tracing::info!(
            "Destroying {} vertices in {} layers...",
            dag.len(),
            layers.len()
        );
        Ok(layers)
    }

    async fn destroy_vertex(&self, name: &str, instance: Instance) -> Result<()> {
        let metadata = self
            .metadata
            .get(name)
            .ok_or_else(|| DagError::VertexFactoryNotFound {
                name: name.to_string(),
            })?;

        tracing::debug!("Destroying: {}", name);
        metadata
            .factory()
            .destroy(instance)
            .await
            .map_err(|source| DagError::DestroyFailed {
                vertex: name.to_string(),
                source,
            })?;
        tracing::debug!("Destroyed: {}", name);
        Ok(())
    }
}
