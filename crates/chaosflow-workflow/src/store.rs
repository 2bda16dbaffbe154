//! Workflow repository trait
//!
//! This module defines how callers fetch workflows and their nodes.
//! A repository hands the assembler a workflow together with the nodes
//! read in the same call; implementations can use the Kubernetes API or
//! keep records in memory.

use crate::convert::{convert_workflow, convert_workflow_detail};
use crate::error::{Result, WorkflowError};
use crate::model::{Workflow, WorkflowDetail};
use async_trait::async_trait;
use chaosflow_crd as crd;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Trait for reading and deleting workflows
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// List workflows in a namespace
    async fn list_workflows(&self, namespace: &str) -> Result<Vec<Workflow>>;

    /// List workflows across all namespaces
    async fn list_all_workflows(&self) -> Result<Vec<Workflow>>;

    /// Get a workflow with its current topology
    async fn get_workflow_detail(&self, namespace: &str, name: &str) -> Result<WorkflowDetail>;

    /// Delete a workflow
    async fn delete_workflow(&self, namespace: &str, name: &str) -> Result<()>;
}

type WorkflowKey = (String, String);

fn workflow_key(workflow: &crd::Workflow) -> WorkflowKey {
    (
        workflow.metadata.namespace.clone().unwrap_or_default(),
        workflow.metadata.name.clone(),
    )
}

fn belongs_to(node: &crd::WorkflowNode, namespace: &str, workflow: &str) -> bool {
    node.metadata.namespace.as_deref().unwrap_or_default() == namespace
        && node.spec.workflow_name == workflow
}

fn poisoned<T>(_: PoisonError<T>) -> WorkflowError {
    WorkflowError::StateStore("memory store lock poisoned".to_string())
}

/// In-memory repository for tests and offline inspection
///
/// Nodes are returned in the order they were put.
#[derive(Debug, Default)]
pub struct MemoryWorkflowStore {
    workflows: RwLock<BTreeMap<WorkflowKey, crd::Workflow>>,
    nodes: RwLock<Vec<crd::WorkflowNode>>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a workflow, replacing one with the same namespace and name
    pub fn put_workflow(&self, workflow: crd::Workflow) -> Result<()> {
        self.workflows
            .write()
            .map_err(poisoned)?
            .insert(workflow_key(&workflow), workflow);
        Ok(())
    }

    /// Save a node, replacing one with the same namespace and name in place
    pub fn put_node(&self, node: crd::WorkflowNode) -> Result<()> {
        let mut nodes = self.nodes.write().map_err(poisoned)?;
        let same = |n: &&mut crd::WorkflowNode| {
            n.metadata.name == node.metadata.name && n.metadata.namespace == node.metadata.namespace
        };
        match nodes.iter_mut().find(same) {
            Some(existing) => *existing = node,
            None => nodes.push(node),
        }
        Ok(())
    }
}

#[async_trait]
impl WorkflowRepository for MemoryWorkflowStore {
    async fn list_workflows(&self, namespace: &str) -> Result<Vec<Workflow>> {
        let workflows = self.workflows.read().map_err(poisoned)?;
        Ok(workflows
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, wf)| convert_workflow(wf))
            .collect())
    }

    async fn list_all_workflows(&self) -> Result<Vec<Workflow>> {
        let workflows = self.workflows.read().map_err(poisoned)?;
        Ok(workflows.values().map(convert_workflow).collect())
    }

    async fn get_workflow_detail(&self, namespace: &str, name: &str) -> Result<WorkflowDetail> {
        let workflows = self.workflows.read().map_err(poisoned)?;
        let workflow = workflows
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| WorkflowError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        let nodes = self.nodes.read().map_err(poisoned)?;
        let nodes: Vec<crd::WorkflowNode> = nodes
            .iter()
            .filter(|n| belongs_to(n, namespace, name))
            .cloned()
            .collect();
        debug!("Assembling {}/{} from {} nodes", namespace, name, nodes.len());

        convert_workflow_detail(workflow, &nodes)
    }

    async fn delete_workflow(&self, namespace: &str, name: &str) -> Result<()> {
        let removed = self
            .workflows
            .write()
            .map_err(poisoned)?
            .remove(&(namespace.to_string(), name.to_string()));
        if removed.is_none() {
            return Err(WorkflowError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }

        // Nodes go with their workflow, as owner references would do.
        self.nodes
            .write()
            .map_err(poisoned)?
            .retain(|n| !belongs_to(n, namespace, name));
        debug!("Deleted workflow {}/{}", namespace, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeState;
    use chaosflow_crd::{
        ConditionStatus, ConditionType, TemplateType, WorkflowNode, WorkflowNodeCondition,
    };

    fn test_workflow(namespace: &str, name: &str) -> crd::Workflow {
        crd::Workflow::new(name, namespace, "the-entry")
    }

    fn test_node(namespace: &str, workflow: &str, name: &str, node_type: TemplateType) -> WorkflowNode {
        WorkflowNode::new(name, namespace, workflow, "the-entry", node_type)
    }

    #[tokio::test]
    async fn test_memory_store_list() {
        let store = MemoryWorkflowStore::new();
        assert!(store.list_all_workflows().await.unwrap().is_empty());

        store.put_workflow(test_workflow("team-a", "wf-2")).unwrap();
        store.put_workflow(test_workflow("team-a", "wf-1")).unwrap();
        store.put_workflow(test_workflow("team-b", "wf-1")).unwrap();

        let team_a = store.list_workflows("team-a").await.unwrap();
        let names: Vec<&str> = team_a.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["wf-1", "wf-2"]);
        assert!(team_a.iter().all(|w| w.namespace == "team-a"));

        assert_eq!(store.list_all_workflows().await.unwrap().len(), 3);
        assert!(store.list_workflows("team-c").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_detail() {
        let store = MemoryWorkflowStore::new();
        store.put_workflow(test_workflow("ns", "wf")).unwrap();
        store
            .put_node(
                test_node("ns", "wf", "the-entry-0", TemplateType::Serial)
                    .with_task("wait-0"),
            )
            .unwrap();
        store
            .put_node(test_node("ns", "wf", "wait-0", TemplateType::Suspend))
            .unwrap();
        // Same workflow name, other namespace.
        store
            .put_node(test_node("other", "wf", "stray-0", TemplateType::Suspend))
            .unwrap();

        let detail = store.get_workflow_detail("ns", "wf").await.unwrap();
        assert_eq!(detail.workflow.entry, "the-entry");
        let names: Vec<&str> = detail.topology.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["the-entry-0", "wait-0"]);
    }

    #[tokio::test]
    async fn test_memory_store_node_update_replaces_in_place() {
        let store = MemoryWorkflowStore::new();
        store.put_workflow(test_workflow("ns", "wf")).unwrap();
        store
            .put_node(test_node("ns", "wf", "a-0", TemplateType::PodChaos))
            .unwrap();
        store
            .put_node(test_node("ns", "wf", "b-0", TemplateType::Suspend))
            .unwrap();
        store
            .put_node(
                test_node("ns", "wf", "a-0", TemplateType::PodChaos).with_condition(
                    WorkflowNodeCondition::new(ConditionType::Accomplished, ConditionStatus::True),
                ),
            )
            .unwrap();

        let detail = store.get_workflow_detail("ns", "wf").await.unwrap();
        assert_eq!(detail.topology.nodes.len(), 2);
        assert_eq!(detail.topology.nodes[0].name, "a-0");
        assert_eq!(detail.topology.nodes[0].state, NodeState::Succeed);
    }

    #[tokio::test]
    async fn test_memory_store_detail_propagates_conversion_error() {
        let store = MemoryWorkflowStore::new();
        store.put_workflow(test_workflow("ns", "wf")).unwrap();
        store
            .put_node(test_node(
                "ns",
                "wf",
                "task-0",
                TemplateType::Unknown("Task".to_string()),
            ))
            .unwrap();

        assert!(matches!(
            store.get_workflow_detail("ns", "wf").await,
            Err(WorkflowError::UnknownNodeType { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_store_not_found() {
        let store = MemoryWorkflowStore::new();

        assert!(matches!(
            store.get_workflow_detail("ns", "missing").await,
            Err(WorkflowError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_workflow("ns", "missing").await,
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_store_delete_removes_nodes() {
        let store = MemoryWorkflowStore::new();
        store.put_workflow(test_workflow("ns", "wf")).unwrap();
        store
            .put_node(test_node("ns", "wf", "wait-0", TemplateType::Suspend))
            .unwrap();

        store.delete_workflow("ns", "wf").await.unwrap();
        assert!(store.list_workflows("ns").await.unwrap().is_empty());

        // A new workflow with the same name starts from an empty topology.
        store.put_workflow(test_workflow("ns", "wf")).unwrap();
        let detail = store.get_workflow_detail("ns", "wf").await.unwrap();
        assert!(detail.topology.nodes.is_empty());
    }
}
