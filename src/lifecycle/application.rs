//! Application Bootstrap
//!
//! Provides a high-level API for creating a graph at startup and destroying
//! it on shutdown.

use super::{DagMaker, LifecycleError, Result, ShutdownHandler};
use crate::config::LifecycleConfig;
use crate::dag::Dag;
use crate::graph::Plan;
use crate::vertex::SharedFactory;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A created graph together with the maker that tears it down
///
/// # Example
///
/// ```rust,ignore
/// use dag_maker::lifecycle::Application;
///
/// #[tokio::main]
/// async fn main() {
///     let app = Application::builder()
///         .vertex(api)
///         .create_timeout(Duration::from_secs(30))
///         .build()
///         .await
///         .expect("Failed to initialize application");
///
///     let api = app.resolve::<Api>("Api").await.expect("Api not created");
///     // Start server...
///
///     app.shutdown().await.expect("Failed to shut down");
/// }
/// ```
#[derive(Clone)]
pub struct Application {
    maker: Arc<DagMaker>,
    dag: Arc<Mutex<Dag>>,
    destroy_timeout: Option<Duration>,
}

impl Application {
    /// Create a new application builder
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn maker(&self) -> &Arc<DagMaker> {
        &self.maker
    }

    pub fn plan(&self) -> Result<Plan> {
        Ok(self.maker.plan()?)
    }

    /// Get a created vertex as `T`
    pub async fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        Ok(self.dag.lock().await.resolve::<T>(name)?)
    }

    /// A copy of the created vertices; empty after shutdown
    pub async fn snapshot(&self) -> Dag {
        self.dag.lock().await.clone()
    }

    /// Create a shutdown handler for graceful shutdown
    pub fn shutdown_handler(&self) -> ShutdownHandler {
        ShutdownHandler::new(self.clone())
    }

    /// Destroy every vertex in dependents order
    ///
    /// Each vertex is forgotten as soon as it is destroyed, so calling this
    /// again after a failure only retries the vertices still alive, and does
    /// nothing after a success.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down application...");

        let mut dag = self.dag.lock().await;
        destroy_within(&self.maker, &mut dag, self.destroy_timeout).await?;

        tracing::info!("Application shutdown complete");
        Ok(())
    }

    /// Spawn a background task that waits for shutdown signals
    /// and performs graceful shutdown automatically.
    pub fn spawn_shutdown_handler(&self) -> tokio::task::JoinHandle<()> {
        let shutdown_handler = self.shutdown_handler();
        tokio::spawn(async move {
            shutdown_handler.wait_for_shutdown().await;
        })
    }
}

/// Builder for Application
#[derive(Default)]
pub struct ApplicationBuilder {
    factories: Vec<SharedFactory>,
    create_timeout: Option<Duration>,
    destroy_timeout: Option<Duration>,
    rollback_on_failure: bool,
}

impl ApplicationBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex; its dependencies are registered implicitly
    pub fn vertex(mut self, factory: SharedFactory) -> Self {
        self.factories.push(factory);
        self
    }

    pub fn vertices<I>(mut self, factories: I) -> Self
    where
        I: IntoIterator<Item = SharedFactory>,
    {
        self.factories.extend(factories);
        self
    }

    /// Apply timeouts and rollback behaviour from configuration
    pub fn config(mut self, config: &LifecycleConfig) -> Self {
        self.create_timeout = config.create_timeout;
        self.destroy_timeout = config.destroy_timeout;
        self.rollback_on_failure = config.rollback_on_failure;
        self
    }

    /// Set a timeout for creating the whole graph
    pub fn create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = Some(timeout);
        self
    }

    /// Set a timeout for destroying the whole graph
    pub fn destroy_timeout(mut self, timeout: Duration) -> Self {
        self.destroy_timeout = Some(timeout);
        self
    }

    /// Destroy the vertices created so far when creation fails
    pub fn rollback_on_failure(mut self, rollback: bool) -> Self {
        self.rollback_on_failure = rollback;
        self
    }

    /// Build the graph and create every vertex
    ///
    /// # Errors
    ///
    /// Returns an error if the graph has a cycle, a factory fails, or the
    /// creation timeout elapses. Rollback failures are logged; the creation
    /// error is returned.
    pub async fn build(self) -> Result<Application> {
        let maker = DagMaker::new(self.factories);

        tracing::info!("Starting application initialization...");

        let mut dag = Dag::new();
        let created = match self.create_timeout {
            Some(timeout) => tokio::time::timeout(timeout, maker.create_into(&mut dag))
                .await
                .map_err(|_| {
                    LifecycleError::timeout("create", format!("Timeout after {:?}", timeout))
                })
                .and_then(|result| result.map_err(LifecycleError::from)),
            None => maker.create_into(&mut dag).await.map_err(LifecycleError::from),
        };

        if let Err(e) = created {
            if self.rollback_on_failure && !dag.is_empty() {
                tracing::warn!("Rolling back {} created vertices", dag.len());
                if let Err(rollback) =
                    destroy_within(&maker, &mut dag, self.destroy_timeout).await
                {
                    tracing::error!("Rollback failed: {}", rollback);
                }
            }
            return Err(e);
        }

        tracing::info!("Application initialization complete");

        Ok(Application {
            maker: Arc::new(maker),
            dag: Arc::new(Mutex::new(dag)),
            destroy_timeout: self.destroy_timeout,
        })
    }
}

async fn destroy_within(
    maker: &DagMaker,
    dag: &mut Dag,
    timeout: Option<Duration>,
) -> Result<()> {
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, maker.destroy_from(dag))
            .await
            .map_err(|_| {
                LifecycleError::timeout("destroy", format!("Timeout after {:?}", timeout))
            })??,
        None => maker.destroy_from(dag).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, DagError};
    use crate::vertex::FnVertex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorded(name: &'static str, log: &Log) -> crate::vertex::FnVertexBuilder {
        let create_log = Arc::clone(log);
        let destroy_log = Arc::clone(log);
        FnVertex::builder(name)
            .on_create(move |_| {
                let log = Arc::clone(&create_log);
                async move {
                    log.lock().await.push(format!("create:{}", name));
                    Ok(name.to_string())
                }
            })
            .on_destroy(move |value: Arc<String>| {
                let log = Arc::clone(&destroy_log);
                async move {
                    log.lock().await.push(format!("destroy:{}", value));
                    Ok(())
                }
            })
    }

    #[tokio::test]
    async fn test_build_and_shutdown() {
        let log = Log::default();
        let database = recorded("Database", &log).build();
        let api = recorded("Api", &log)
            .depends_on("database", database)
            .build();

        let app = Application::builder().vertex(api).build().await.unwrap();
        assert_eq!(*app.resolve::<String>("Api").await.unwrap(), "Api");
        assert_eq!(app.snapshot().await.len(), 2);

        app.shutdown().await.unwrap();
        assert!(app.snapshot().await.is_empty());

        // second shutdown has nothing left to destroy
        app.shutdown().await.unwrap();
        assert_eq!(
            *log.lock().await,
            vec!["create:Database", "create:Api", "destroy:Api", "destroy:Database"]
        );
    }

    #[tokio::test]
    async fn test_rollback_on_failure() {
        let log = Log::default();
        let database = recorded("Database", &log).build();
        let broken = FnVertex::builder("Broken")
            .depends_on("database", database)
            .on_create(|_| async { Err::<(), BoxError>("refused".into()) })
            .build();

        let result = Application::builder()
            .vertex(broken)
            .rollback_on_failure(true)
            .build()
            .await;

        match result {
            Err(LifecycleError::Dag(DagError::CreateFailed { vertex, .. })) => {
                assert_eq!(vertex, "Broken")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected failure"),
        }
        assert_eq!(*log.lock().await, vec!["create:Database", "destroy:Database"]);
    }

    #[tokio::test]
    async fn test_no_rollback_by_default() {
        let log = Log::default();
        let database = recorded("Database", &log).build();
        let broken = FnVertex::builder("Broken")
            .depends_on("database", database)
            .on_create(|_| async { Err::<(), BoxError>("refused".into()) })
            .build();

        assert!(Application::builder().vertex(broken).build().await.is_err());
        assert_eq!(*log.lock().await, vec!["create:Database"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_timeout() {
        let stuck = FnVertex::builder("Stuck")
            .on_create(|_| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
            .build();

        let config = LifecycleConfig {
            create_timeout: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let result = Application::builder().vertex(stuck).config(&config).build().await;

        assert!(matches!(result, Err(LifecycleError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_plan() {
        let log = Log::default();
        let a = recorded("A", &log).build();
        let b = recorded("B", &log).depends_on("a", a.clone()).build();

        let app = Application::builder().vertices([a, b]).build().await.unwrap();
        let plan = app.plan().unwrap();
        assert_eq!(plan.creation, vec![vec!["A"], vec!["B"]]);
        assert_eq!(plan.destruction, vec![vec!["B"], vec!["A"]]);
    }

    #[tokio::test]
    async fn test_shutdown_after_failed_destroy_destroys_each_vertex_once() {
        let log = Log::default();
        let destroy_log = Arc::clone(&log);
        let database = FnVertex::builder("Database")
            .on_destroy(move |_: Arc<()>| {
                let log = Arc::clone(&destroy_log);
                async move {
                    log.lock().await.push("destroy:Database".to_string());
                    Err::<(), BoxError>("still busy".into())
                }
            })
            .build();
        let api = recorded("Api", &log).depends_on("database", database).build();

        let app = Application::builder().vertex(api).build().await.unwrap();
        log.lock().await.clear();

        assert!(app.shutdown().await.is_err());
        assert_eq!(app.snapshot().await.names().collect::<Vec<_>>(), vec!["Database"]);

        assert!(app.shutdown().await.is_err());
        assert_eq!(
            *log.lock().await,
            vec!["destroy:Api", "destroy:Database", "destroy:Database"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollback_respects_destroy_timeout() {
        let database = FnVertex::builder("Database")
            .on_destroy(|_: Arc<()>| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
            .build();
        let broken = FnVertex::builder("Broken")
            .depends_on("database", database)
            .on_create(|_| async { Err::<(), BoxError>("refused".into()) })
            .build();

        let result = Application::builder()
            .vertex(broken)
            .rollback_on_failure(true)
            .destroy_timeout(Duration::from_millis(100))
            .build()
            .await;

        assert!(matches!(
            result,
            Err(LifecycleError::Dag(DagError::CreateFailed { .. }))
        ));
    }
}
