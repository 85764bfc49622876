//! Error types for the workflow graph engine
//!
//! Validation problems are never errors: they are reported as
//! [`ValidationIssue`](crate::validation::ValidationIssue) data. This type
//! only covers the fallible boundaries (decoding, file loading, ordering).

use thiserror::Error;

use crate::types::NodeId;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur at the edges of the graph engine
#[derive(Debug, Error)]
pub enum GraphError {
    /// Graph or config JSON could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a graph or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The graph cannot be ordered because some nodes sit on a cycle
    #[error("Cycle detected; {} node(s) could not be ordered: {}", remaining.len(), remaining.join(", "))]
    CycleDetected { remaining: Vec<NodeId> },

    /// Engine configuration is structurally valid JSON but semantically wrong
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    /// Create an invalid configuration error with a message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
