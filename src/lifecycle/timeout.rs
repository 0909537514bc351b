use super::LifecycleError;
use crate::error::BoxError;
use crate::vertex::{Dependencies, Instance, SharedFactory, VertexFactory, VertexOptions};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Bounds the `create` and `destroy` operations of another factory
///
/// Keeps the name and dependencies of the wrapped factory, so it can stand in
/// for it anywhere in a graph. An elapsed timeout fails the operation with
/// [`LifecycleError::Timeout`].
///
/// # Example
/// ```rust,ignore
/// let database = TimeoutVertex::wrap(database)
///     .create_timeout(Duration::from_secs(10))
///     .destroy_timeout(Duration::from_secs(5))
///     .shared();
/// ```
pub struct TimeoutVertex {
    inner: SharedFactory,
    create_timeout: Option<Duration>,
    destroy_timeout: Option<Duration>,
}

impl TimeoutVertex {
    pub fn wrap(inner: SharedFactory) -> Self {
        Self {
            inner,
            create_timeout: None,
            destroy_timeout: None,
        }
    }

    pub fn create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = Some(timeout);
        self
    }

    pub fn destroy_timeout(mut self, timeout: Duration) -> Self {
        self.destroy_timeout = Some(timeout);
        self
    }

    pub fn shared(self) -> SharedFactory {
        Arc::new(self)
    }
}

#[async_trait]
impl VertexFactory for TimeoutVertex {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dependencies(&self) -> Dependencies {
        self.inner.dependencies()
    }

    async fn create(&self, options: VertexOptions) -> Result<Instance, BoxError> {
        match self.create_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.inner.create(options))
                .await
                .map_err(|_| {
                    LifecycleError::timeout(
                        format!("create of {}", self.inner.name()),
                        format!("Timeout after {:?}", timeout),
                    )
                })?,
            None => self.inner.create(options).await,
        }
    }

    async fn destroy(&self, instance: Instance) -> Result<(), BoxError> {
        match self.destroy_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.inner.destroy(instance))
                .await
                .map_err(|_| {
                    LifecycleError::timeout(
                        format!("destroy of {}", self.inner.name()),
                        format!("Timeout after {:?}", timeout),
                    )
                })?,
            None => self.inner.destroy(instance).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::FnVertex;

    fn slow(name: &str, delay: Duration) -> SharedFactory {
        FnVertex::builder(name)
            .on_create(move |_| async move {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .on_destroy(move |_: Arc<()>| async move {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_times_out() {
        let vertex = TimeoutVertex::wrap(slow("Slow", Duration::from_secs(60)))
            .create_timeout(Duration::from_secs(1))
            .shared();

        assert_eq!(vertex.name(), "Slow");
        let err = vertex.create(VertexOptions::new()).await.unwrap_err();
        let err = err.downcast::<LifecycleError>().unwrap();
        assert!(matches!(*err, LifecycleError::Timeout { .. }));
        assert_eq!(err.to_string(), "Timeout during create of Slow: Timeout after 1s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_times_out() {
        let vertex = TimeoutVertex::wrap(slow("Slow", Duration::from_secs(60)))
            .destroy_timeout(Duration::from_secs(1))
            .shared();

        let instance = vertex.create(VertexOptions::new()).await.unwrap();
        assert!(vertex.destroy(instance).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operations_pass_through() {
        let dependency = FnVertex::builder("Dependency").build();
        let inner = FnVertex::builder("Fast")
            .depends_on("dependency", dependency)
            .build();
        let vertex = TimeoutVertex::wrap(inner)
            .create_timeout(Duration::from_secs(1))
            .destroy_timeout(Duration::from_secs(1))
            .shared();

        assert!(vertex.dependencies().contains_key("dependency"));
        let instance = vertex.create(VertexOptions::new()).await.unwrap();
        vertex.destroy(instance).await.unwrap();
    }
}
