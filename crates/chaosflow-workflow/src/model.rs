//! Execution view of a workflow
//!
//! These are the types handed to the presentation layer. They serialize to
//! the JSON shape dashboards already consume.

use chaosflow_crd::WorkflowSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Workflow identity and execution root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workflow {
    pub namespace: String,
    pub name: String,
    /// Template the workflow starts from
    pub entry: String,
}

/// A workflow together with a snapshot of its node graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowDetail {
    #[serde(flatten)]
    pub workflow: Workflow,

    pub topology: Topology,

    /// The persisted identity and spec, exactly as read
    pub kube_object: KubeObjectDesc,
}

/// The nodes of one workflow, in the order they were read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Topology {
    pub nodes: Vec<Node>,
}

impl Topology {
    /// Find a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// One vertex of the execution graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub name: String,

    #[serde(flatten)]
    pub kind: NodeKind,

    pub state: NodeState,

    /// Template the node was instantiated from
    pub template: String,
}

impl Node {
    /// Child task names; empty for leaves
    pub fn tasks(&self) -> &[String] {
        match &self.kind {
            NodeKind::Serial { serial } => &serial.tasks,
            NodeKind::Parallel { parallel } => &parallel.tasks,
            NodeKind::Suspend | NodeKind::ChaosNode => &[],
        }
    }

    pub fn serial(&self) -> Option<&NodeSerial> {
        match &self.kind {
            NodeKind::Serial { serial } => Some(serial),
            _ => None,
        }
    }

    pub fn parallel(&self) -> Option<&NodeParallel> {
        match &self.kind {
            NodeKind::Parallel { parallel } => Some(parallel),
            _ => None,
        }
    }
}

/// Kind of a node; only the branching kinds carry children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum NodeKind {
    Serial { serial: NodeSerial },
    Parallel { parallel: NodeParallel },
    Suspend,
    /// Any fault-injection action, whatever the fault
    ChaosNode,
}

/// Children run one after another, in this order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NodeSerial {
    pub tasks: Vec<String>,
}

/// Children run concurrently
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NodeParallel {
    pub tasks: Vec<String>,
}

/// Run state of a node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeState {
    Running,
    Succeed,
    /// Never derived from conditions today
    Failed,
}

/// Persisted identity and spec of a workflow, for audit display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KubeObjectDesc {
    pub meta: KubeObjectMeta,
    pub spec: WorkflowSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct KubeObjectMeta {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn serial_node() -> Node {
        Node {
            name: "the-entry-0".to_string(),
            kind: NodeKind::Serial {
                serial: NodeSerial {
                    tasks: vec!["child-0".to_string(), "child-1".to_string()],
                },
            },
            state: NodeState::Running,
            template: "the-entry".to_string(),
        }
    }

    #[test]
    fn test_node_accessors() {
        let node = serial_node();
        assert_eq!(node.tasks(), ["child-0", "child-1"]);
        assert!(node.serial().is_some());
        assert!(node.parallel().is_none());

        let leaf = Node {
            kind: NodeKind::ChaosNode,
            ..serial_node()
        };
        assert!(leaf.tasks().is_empty());
        assert!(leaf.serial().is_none());
    }

    #[test]
    fn test_node_json_shape() {
        assert_eq!(
            serde_json::to_value(serial_node()).unwrap(),
            json!({
                "name": "the-entry-0",
                "type": "Serial",
                "serial": {"tasks": ["child-0", "child-1"]},
                "state": "Running",
                "template": "the-entry"
            })
        );

        let suspend = Node {
            name: "wait-0".to_string(),
            kind: NodeKind::Suspend,
            state: NodeState::Succeed,
            template: "wait".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&suspend).unwrap(),
            json!({"name": "wait-0", "type": "Suspend", "state": "Succeed", "template": "wait"})
        );
    }

    #[test]
    fn test_node_decodes_from_json_shape() {
        let node: Node = serde_json::from_value(json!({
            "name": "branches-0",
            "type": "Parallel",
            "parallel": {"tasks": ["b", "a"]},
            "state": "Failed",
            "template": "branches"
        }))
        .unwrap();

        assert_eq!(node.parallel().unwrap().tasks, vec!["b", "a"]);
        assert_eq!(node.state, NodeState::Failed);
    }

    #[test]
    fn test_empty_topology_serializes_nodes() {
        assert_eq!(
            serde_json::to_value(Topology::default()).unwrap(),
            json!({"nodes": []})
        );
    }

    #[test]
    fn test_topology_lookup() {
        let topology = Topology {
            nodes: vec![serial_node()],
        };
        assert_eq!(topology.node("the-entry-0").unwrap().template, "the-entry");
        assert!(topology.node("missing").is_none());
    }
}
