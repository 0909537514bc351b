use thiserror::Error;

/// Error type returned by vertex factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, DagError>;

#[derive(Debug, Error)]
pub enum DagError {
    #[error("Circular dependency detected among: {}", remaining.join(", "))]
    CircularDependency { remaining: Vec<String> },

    #[error("Vertex \"{name}\" not found")]
    VertexNotFound { name: String },

    #[error("Vertex factory \"{name}\" not found")]
    VertexFactoryNotFound { name: String },

    #[error("Failed to create vertex \"{vertex}\": {source}")]
    CreateFailed {
        vertex: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to destroy vertex \"{vertex}\": {source}")]
    DestroyFailed {
        vertex: String,
        #[source]
        source: BoxError,
    },

    #[error("Option not found: {key}")]
    OptionNotFound { key: String },

    #[error("Failed to downcast \"{key}\", required: '{expected}' actual: '{actual}'")]
    DowncastFailed {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl DagError {
    /// Returns true if the error was raised by a factory rather than by the graph itself
    pub fn is_factory_failure(&self) -> bool {
        matches!(
            self,
            DagError::CreateFailed { .. } | DagError::DestroyFailed { .. }
        )
    }

    /// Name of the vertex whose factory failed, if any
    pub fn vertex(&self) -> Option<&str> {
        match self {
            DagError::CreateFailed { vertex, .. } | DagError::DestroyFailed { vertex, .. } => {
                Some(vertex.as_str())
            }
            DagError::VertexNotFound { name } | DagError::VertexFactoryNotFound { name } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}
