//! Chaosflow Workflow Engine
//!
//! This crate derives the execution view of a chaos workflow from its
//! persisted resources: the node graph (topology) and the run state of
//! every node.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              WorkflowRepository                      │
//! │   Memory | Kubernetes API (dynamic objects)          │
//! └─────────────────────────────────────────────────────┘
//!                        │  Workflow + WorkflowNode records
//!                        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │              convert                                 │
//! │   workflow header | node kind + state | topology     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!            WorkflowDetail { Workflow, Topology, KubeObjectDesc }
//! ```
//!
//! Conversion is pure: the same records always produce the same detail, so
//! it is safe to re-run on every reconciliation.
//!
//! # Example
//!
//! ```ignore
//! use chaosflow_workflow::convert_workflow_detail;
//!
//! let detail = convert_workflow_detail(&workflow, &nodes)?;
//! for node in &detail.topology.nodes {
//!     println!("{} {:?}", node.name, node.state);
//! }
//! ```

pub mod convert;
pub mod error;
pub mod kube_store;
pub mod model;
pub mod store;

pub use convert::*;
pub use error::*;
pub use kube_store::KubeWorkflowStore;
pub use model::*;
pub use store::*;
