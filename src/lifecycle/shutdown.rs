//! Graceful Shutdown Handler
//!
//! Handles OS signals and destroys the application's graph.

use super::Application;
use tokio::signal;

/// Handles graceful shutdown of the application
///
/// ShutdownHandler listens for OS signals (SIGTERM, SIGINT) and then
/// destroys every created vertex in dependents order.
///
/// # Example
///
/// ```rust,ignore
/// let shutdown_handler = app.shutdown_handler();
///
/// tokio::spawn(async move {
///     shutdown_handler.wait_for_shutdown().await;
///     std::process::exit(0);
/// });
/// ```
pub struct ShutdownHandler {
    application: Application,
}

impl ShutdownHandler {
    /// Create a new ShutdownHandler
    pub fn new(application: Application) -> Self {
        Self { application }
    }

    /// Wait for a shutdown signal and perform graceful shutdown
    pub async fn wait_for_shutdown(&self) {
        shutdown_signal().await;
        self.shutdown().await;
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) {
        tracing::info!("Starting graceful shutdown...");

        if let Err(e) = self.application.shutdown().await {
            tracing::error!("Error during shutdown: {}", e);
        }

        tracing::info!("Graceful shutdown complete");
    }
}

/// Create a future that completes when a shutdown signal is received
///
/// This is a standalone function that can be used without a ShutdownHandler.
///
/// # Example
///
/// ```rust,ignore
/// use dag_maker::lifecycle::shutdown_signal;
///
/// tokio::select! {
///     _ = shutdown_signal() => {
///         println!("Shutdown signal received");
///     }
///     _ = server.serve() => {}
/// }
/// ```
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
