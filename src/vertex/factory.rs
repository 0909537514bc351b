use super::VertexOptions;
use crate::error::BoxError;
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A factory shared between the caller and every vertex that depends on it
pub type SharedFactory = Arc<dyn VertexFactory>;

/// Declared dependencies of a vertex: local binding name -> dependency factory
pub type Dependencies = BTreeMap<String, SharedFactory>;

/// A type-erased, shareable handle to a built vertex
///
/// Keeps the name of the stored type around so a failed downcast can report
/// what was actually built.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    /// Name of the type stored in this instance
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Send + Sync + 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Attempts to get the stored value as `T`
    ///
    /// Returns the actual type name on mismatch.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, &'static str> {
        self.value
            .clone()
            .downcast::<T>()
            .map_err(|_| self.type_name)
    }

    /// Returns true if both handles point at the same built value
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// A constructible and destructible unit of a dependency graph
///
/// Vertices are identified purely by [`name`](VertexFactory::name): two
/// factories with the same name are the same vertex, and the first one seen
/// wins.
///
/// # Example
///
/// ```rust,ignore
/// use dag_maker::prelude::*;
///
/// struct DatabaseFactory {
///     config: SharedFactory,
/// }
///
/// #[async_trait]
/// impl VertexFactory for DatabaseFactory {
///     fn name(&self) -> &str {
///         "Database"
///     }
///
///     fn dependencies(&self) -> Dependencies {
///         Dependencies::from([("config".to_string(), self.config.clone())])
///     }
///
///     async fn create(&self, options: VertexOptions) -> Result<Instance, BoxError> {
///         let config = options.get::<Config>("config")?;
///         Ok(Instance::new(Database::connect(&config.url).await?))
///     }
///
///     async fn destroy(&self, instance: Instance) -> Result<(), BoxError> {
///         let db = instance.downcast::<Database>().map_err(|t| format!("unexpected {t}"))?;
///         db.close().await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait VertexFactory: Send + Sync {
    /// Stable, unique name of the vertex
    fn name(&self) -> &str;

    /// Dependencies injected into [`create`](VertexFactory::create), keyed by local binding name
    fn dependencies(&self) -> Dependencies {
        Dependencies::new()
    }

    /// Builds a new instance from the already built dependency instances
    async fn create(&self, options: VertexOptions) -> Result<Instance, BoxError>;

    /// Releases an instance previously returned by [`create`](VertexFactory::create)
    async fn destroy(&self, instance: Instance) -> Result<(), BoxError>;
}
