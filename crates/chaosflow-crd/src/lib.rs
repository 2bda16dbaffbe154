//! Chaosflow Resource Types
//!
//! This crate provides serde models of the resources a chaos workflow is
//! persisted as inside the cluster.
//!
//! # API Group
//!
//! All types use the `chaos-mesh.org/v1alpha1` API group.
//!
//! # Resources
//!
//! - `Workflow` - The declared graph: entry point plus named templates
//! - `WorkflowNode` - One instantiated template, with its recorded conditions
//! - `StressChaos` - A memory/CPU stress action and its stressors

pub mod error;
pub mod metadata;
pub mod node;
pub mod quantity;
pub mod stress;
pub mod workflow;

pub use error::*;
pub use metadata::*;
pub use node::*;
pub use quantity::*;
pub use stress::*;
pub use workflow::*;

/// API version for all chaos resources
pub const API_VERSION: &str = "chaos-mesh.org/v1alpha1";

/// API group for all chaos resources
pub const API_GROUP: &str = "chaos-mesh.org";

/// API version string
pub const VERSION: &str = "v1alpha1";

/// Label the controller puts on every node it creates for a workflow
pub const LABEL_WORKFLOW: &str = "chaos-mesh.org/workflow";
