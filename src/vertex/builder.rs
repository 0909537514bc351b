use super::{Dependencies, Instance, SharedFactory, VertexFactory, VertexOptions};
use crate::error::{BoxError, DagError};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

type CreateFn = Arc<dyn Fn(VertexOptions) -> BoxFuture<'static, Result<Instance, BoxError>> + Send + Sync>;
type DestroyFn = Arc<dyn Fn(Instance) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// A vertex factory assembled from closures
///
/// Use [`FnVertex::builder`] to declare dependencies explicitly instead of
/// implementing [`VertexFactory`] by hand.
///
/// # Example
/// ```rust,ignore
/// let config = FnVertex::builder("Config")
///     .on_create(|_| async { Ok(Config::from_env()?) })
///     .build();
///
/// let database = FnVertex::builder("Database")
///     .depends_on("config", config.clone())
///     .on_create(|options| async move {
///         let config = options.get::<Config>("config")?;
///         Ok(Database::connect(&config.url).await?)
///     })
///     .on_destroy(|db: Arc<Database>| async move { Ok(db.close().await?) })
///     .build();
/// ```
pub struct FnVertex {
    name: String,
    dependencies: Dependencies,
    create: CreateFn,
    destroy: DestroyFn,
}

impl FnVertex {
    pub fn builder(name: impl Into<String>) -> FnVertexBuilder {
        FnVertexBuilder::new(name)
    }
}

#[async_trait]
impl VertexFactory for FnVertex {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Dependencies {
        self.dependencies.clone()
    }

    async fn create(&self, options: VertexOptions) -> Result<Instance, BoxError> {
        (self.create)(options).await
    }

    async fn destroy(&self, instance: Instance) -> Result<(), BoxError> {
        (self.destroy)(instance).await
    }
}

/// Builder for [`FnVertex`]
///
/// Without `on_create` the vertex builds a unit value; without `on_destroy`
/// teardown is a no-op.
pub struct FnVertexBuilder {
    name: String,
    dependencies: Dependencies,
    create: Option<CreateFn>,
    destroy: Option<DestroyFn>,
}

impl FnVertexBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Dependencies::new(),
            create: None,
            destroy: None,
        }
    }

    /// Declare a dependency, injected into `on_create` under `local`
    pub fn depends_on(mut self, local: impl Into<String>, factory: SharedFactory) -> Self {
        self.dependencies.insert(local.into(), factory);
        self
    }

    pub fn on_create<F, Fut, T>(mut self, create: F) -> Self
    where
        F: Fn(VertexOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
        T: Send + Sync + 'static,
    {
        let create: CreateFn = Arc::new(move |options: VertexOptions| {
            create(options)
                .map(|result| result.map(Instance::new))
                .boxed()
        });
        self.create = Some(create);
        self
    }

    /// Set the teardown, receiving the value built by `on_create`
    pub fn on_destroy<F, Fut, T>(mut self, destroy: F) -> Self
    where
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
        T: Send + Sync + 'static,
    {
        let name = self.name.clone();
        let destroy: DestroyFn = Arc::new(move |instance: Instance| {
            match instance.downcast::<T>() {
                Ok(value) => destroy(value).boxed(),
                Err(actual) => {
                    let error: BoxError = Box::new(DagError::DowncastFailed {
                        key: name.clone(),
                        expected: std::any::type_name::<T>(),
                        actual,
                    });
                    futures::future::ready(Err(error)).boxed()
                }
            }
        });
        self.destroy = Some(destroy);
        self
    }

    pub fn build(self) -> SharedFactory {
        let create = self.create.unwrap_or_else(|| {
            let unit: CreateFn = Arc::new(|_: VertexOptions| {
                futures::future::ok::<_, BoxError>(Instance::new(())).boxed()
            });
            unit
        });
        let destroy = self.destroy.unwrap_or_else(|| {
            let noop: DestroyFn =
                Arc::new(|_: Instance| futures::future::ok::<_, BoxError>(()).boxed());
            noop
        });

        Arc::new(FnVertex {
            name: self.name,
            dependencies: self.dependencies,
            create,
            destroy,
        })
    }
}
