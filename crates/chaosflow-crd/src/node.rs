//! WorkflowNode resource types
//!
//! The workflow controller creates one `WorkflowNode` per instantiated
//! template and records its progress as conditions on the node status.

use crate::{EmbedChaos, ObjectMeta, TemplateType, TypeMeta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// WorkflowNode resource: one vertex of a running workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    #[serde(default)]
    pub metadata: ObjectMeta,

    pub spec: WorkflowNodeSpec,

    #[serde(default)]
    pub status: WorkflowNodeStatus,
}

impl WorkflowNode {
    /// Create a node for `workflow` instantiated from `template`
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        workflow: impl Into<String>,
        template: impl Into<String>,
        node_type: TemplateType,
    ) -> Self {
        let workflow = workflow.into();
        Self {
            type_meta: TypeMeta::workflow_node(),
            metadata: ObjectMeta::with_namespace(name, namespace)
                .with_label(crate::LABEL_WORKFLOW, workflow.clone()),
            spec: WorkflowNodeSpec {
                template_name: template.into(),
                workflow_name: workflow,
                node_type,
                start_time: None,
                deadline: None,
                tasks: Vec::new(),
                embed_chaos: EmbedChaos::default(),
            },
            status: WorkflowNodeStatus::default(),
        }
    }

    /// Add a child task
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.spec.tasks.push(task.into());
        self
    }

    /// Record a condition
    pub fn with_condition(mut self, condition: WorkflowNodeCondition) -> Self {
        self.status.conditions.push(condition);
        self
    }
}

/// WorkflowNode specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNodeSpec {
    pub template_name: String,

    pub workflow_name: String,

    #[serde(rename = "type")]
    pub node_type: TemplateType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,

    /// Child node names of a Serial or Parallel node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,

    #[serde(flatten)]
    pub embed_chaos: EmbedChaos,
}

/// WorkflowNode status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNodeStatus {
    /// Conditions in the order the controller recorded them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<WorkflowNodeCondition>,
}

/// A typed boolean signal recorded against a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNodeCondition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

impl WorkflowNodeCondition {
    pub fn new(condition_type: ConditionType, status: ConditionStatus) -> Self {
        Self {
            condition_type,
            status,
            reason: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Whether this condition is of `condition_type` and currently true
    pub fn is_true(&self, condition_type: &ConditionType) -> bool {
        &self.condition_type == condition_type && self.status == ConditionStatus::True
    }
}

/// Condition type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    /// The node finished what it was asked to do
    Accomplished,
    /// The node ran past its deadline
    DeadlineExceeded,
    /// The embedded chaos has been injected
    ChaosInjected,
    /// Anything recorded by a newer controller
    Other(String),
}

impl ConditionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionType::Accomplished => "Accomplished",
            ConditionType::DeadlineExceeded => "DeadlineExceed",
            ConditionType::ChaosInjected => "ChaosInjected",
            ConditionType::Other(other) => other,
        }
    }
}

impl From<String> for ConditionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Accomplished" => ConditionType::Accomplished,
            "DeadlineExceed" | "DeadlineExceeded" => ConditionType::DeadlineExceeded,
            "ChaosInjected" => ConditionType::ChaosInjected,
            _ => ConditionType::Other(value),
        }
    }
}

impl From<ConditionType> for String {
    fn from(value: ConditionType) -> Self {
        match value {
            ConditionType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kubernetes condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_node_new() {
        let node = WorkflowNode::new(
            "the-entry-0",
            "chaos-testing",
            "try-workflow",
            "the-entry",
            TemplateType::Serial,
        )
        .with_task("network-delay-0")
        .with_task("wait-0");

        assert_eq!(node.type_meta.kind, "WorkflowNode");
        assert_eq!(node.spec.workflow_name, "try-workflow");
        assert_eq!(node.spec.tasks, vec!["network-delay-0", "wait-0"]);
        assert_eq!(
            node.metadata.labels.get(crate::LABEL_WORKFLOW),
            Some(&"try-workflow".to_string())
        );
    }

    #[test]
    fn test_condition_is_true() {
        let accomplished =
            WorkflowNodeCondition::new(ConditionType::Accomplished, ConditionStatus::True);
        assert!(accomplished.is_true(&ConditionType::Accomplished));
        assert!(!accomplished.is_true(&ConditionType::DeadlineExceeded));

        let pending =
            WorkflowNodeCondition::new(ConditionType::Accomplished, ConditionStatus::False);
        assert!(!pending.is_true(&ConditionType::Accomplished));
    }

    #[test]
    fn test_condition_type_wire_names() {
        assert_eq!(
            ConditionType::from("DeadlineExceed".to_string()),
            ConditionType::DeadlineExceeded
        );
        assert_eq!(ConditionType::DeadlineExceeded.to_string(), "DeadlineExceed");
        assert_eq!(
            ConditionType::from("Paused".to_string()),
            ConditionType::Other("Paused".to_string())
        );
    }

    #[test]
    fn test_workflow_node_manifest_format() {
        let manifest = r#"{
            "apiVersion": "chaos-mesh.org/v1alpha1",
            "kind": "WorkflowNode",
            "metadata": {
                "name": "deadline-exceed-node-0",
                "namespace": "chaos-testing",
                "labels": {"chaos-mesh.org/workflow": "some-workflow"}
            },
            "spec": {
                "templateName": "deadline-exceed-node",
                "workflowName": "some-workflow",
                "type": "PodChaos",
                "startTime": "2021-03-01T08:00:00Z",
                "deadline": "2021-03-01T08:05:00Z",
                "podChaos": {"action": "pod-kill", "mode": "one"}
            },
            "status": {
                "conditions": [
                    {"type": "ChaosInjected", "status": "True", "reason": "injected"},
                    {"type": "DeadlineExceed", "status": "True", "reason": "deadline reached"}
                ]
            }
        }"#;

        let node: WorkflowNode = serde_json::from_str(manifest).unwrap();
        assert_eq!(node.spec.node_type, TemplateType::PodChaos);
        assert!(node.spec.tasks.is_empty());
        assert!(node.spec.start_time.is_some());
        assert_eq!(
            node.spec.embed_chaos.get(&TemplateType::PodChaos).unwrap()["action"],
            "pod-kill"
        );
        assert_eq!(node.status.conditions.len(), 2);
        assert!(node.status.conditions[1].is_true(&ConditionType::DeadlineExceeded));
    }

    #[test]
    fn test_unknown_node_type_decodes() {
        let manifest = r#"{
            "metadata": {"name": "task-0"},
            "spec": {"templateName": "task", "workflowName": "wf", "type": "Task"}
        }"#;

        let node: WorkflowNode = serde_json::from_str(manifest).unwrap();
        assert_eq!(node.spec.node_type, TemplateType::Unknown("Task".to_string()));
        assert!(node.status.conditions.is_empty());
        assert_eq!(node.type_meta, TypeMeta::default());
    }
}
