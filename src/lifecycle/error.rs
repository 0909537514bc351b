//! Lifecycle-specific error types

use crate::config::ConfigError;
use crate::error::DagError;
use thiserror::Error;

/// Errors that can occur while bootstrapping or shutting down an application
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Creating or destroying the graph failed
    #[error(transparent)]
    Dag(#[from] DagError),

    /// Configuration could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Operation timed out
    #[error("Timeout during {phase}: {message}")]
    Timeout {
        /// The lifecycle phase where timeout occurred
        phase: String,
        /// Additional error message
        message: String,
    },
}

impl LifecycleError {
    /// Create a timeout error
    pub fn timeout(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            phase: phase.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
