//! Error types for workflow conversion and lookup

use thiserror::Error;

/// Error type for workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A node declares a type outside the known set
    #[error("node '{node}' has unknown type '{node_type}'")]
    UnknownNodeType { node: String, node_type: String },

    /// Workflow not found
    #[error("workflow not found: {namespace}/{name}")]
    NotFound { namespace: String, name: String },

    /// State store error
    #[error("state store error: {0}")]
    StateStore(String),

    /// Kubernetes API error
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::UnknownNodeType {
            node: "task-0".to_string(),
            node_type: "Task".to_string(),
        };
        assert_eq!(err.to_string(), "node 'task-0' has unknown type 'Task'");

        let err = WorkflowError::NotFound {
            namespace: "chaos-testing".to_string(),
            name: "try-workflow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "workflow not found: chaos-testing/try-workflow"
        );
    }
}
