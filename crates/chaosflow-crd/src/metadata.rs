//! Common metadata types for chaos resources

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Kubernetes-style object metadata
///
/// Fields the API server adds that nothing here reads (managed fields,
/// generation, owner references) are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name (required)
    #[serde(default)]
    pub name: String,

    /// Namespace; cluster-scoped or not yet defaulted objects carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Unique identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,

    /// Resource version for optimistic concurrency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl ObjectMeta {
    /// Create new metadata with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create new metadata with name and namespace
    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

/// Type metadata for chaos resources
///
/// Items of a list response usually come without `apiVersion`/`kind`, so
/// both fields default to empty on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// API version (e.g., "chaos-mesh.org/v1alpha1")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,

    /// Kind (e.g., "Workflow", "WorkflowNode", "StressChaos")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    fn of(kind: &str) -> Self {
        Self {
            api_version: crate::API_VERSION.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Create type metadata for Workflow
    pub fn workflow() -> Self {
        Self::of("Workflow")
    }

    /// Create type metadata for WorkflowNode
    pub fn workflow_node() -> Self {
        Self::of("WorkflowNode")
    }

    /// Create type metadata for StressChaos
    pub fn stress_chaos() -> Self {
        Self::of("StressChaos")
    }
}
