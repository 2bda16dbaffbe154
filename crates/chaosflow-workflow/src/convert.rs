//! Conversion from persisted resources to the execution view
//!
//! Everything here is a pure function of its inputs: records are only
//! borrowed, nothing is logged, and the first error is returned as is.

use crate::error::{Result, WorkflowError};
use crate::model::{
    KubeObjectDesc, KubeObjectMeta, Node, NodeKind, NodeParallel, NodeSerial, NodeState,
    Topology, Workflow, WorkflowDetail,
};
use chaosflow_crd as crd;
use chaosflow_crd::{ConditionType, TemplateType, WorkflowNodeCondition};

/// Derive a node's run state from its conditions
///
/// `Accomplished` is checked before `DeadlineExceed`. A node past its
/// deadline counts as done, not failed. Conditions are scanned in the order
/// given.
pub fn resolve_node_state(conditions: &[WorkflowNodeCondition]) -> NodeState {
    let any_true = |condition_type: ConditionType| {
        conditions.iter().any(|c| c.is_true(&condition_type))
    };

    if any_true(ConditionType::Accomplished) {
        return NodeState::Succeed;
    }
    // TODO: deadline expiry is reported as success; revisit once failed
    // chaos injections get a condition of their own.
    if any_true(ConditionType::DeadlineExceeded) {
        return NodeState::Succeed;
    }
    NodeState::Running
}

/// Project a workflow record onto its identity and entry
pub fn convert_workflow(workflow: &crd::Workflow) -> Workflow {
    Workflow {
        namespace: workflow.metadata.namespace.clone().unwrap_or_default(),
        name: workflow.metadata.name.clone(),
        entry: workflow.spec.entry.clone(),
    }
}

/// Convert one node record
///
/// Task names are copied, not resolved against other nodes.
pub fn convert_workflow_node(node: &crd::WorkflowNode) -> Result<Node> {
    let spec = &node.spec;

    let kind = match &spec.node_type {
        TemplateType::Serial => NodeKind::Serial {
            serial: NodeSerial {
                tasks: spec.tasks.clone(),
            },
        },
        TemplateType::Parallel => NodeKind::Parallel {
            parallel: NodeParallel {
                tasks: spec.tasks.clone(),
            },
        },
        TemplateType::Suspend => NodeKind::Suspend,
        TemplateType::AwsChaos
        | TemplateType::DnsChaos
        | TemplateType::GcpChaos
        | TemplateType::HttpChaos
        | TemplateType::IoChaos
        | TemplateType::JvmChaos
        | TemplateType::KernelChaos
        | TemplateType::NetworkChaos
        | TemplateType::PodChaos
        | TemplateType::StressChaos
        | TemplateType::TimeChaos => NodeKind::ChaosNode,
        TemplateType::Unknown(other) => {
            return Err(WorkflowError::UnknownNodeType {
                node: node.metadata.name.clone(),
                node_type: other.clone(),
            })
        }
    };

    Ok(Node {
        name: node.metadata.name.clone(),
        kind,
        state: resolve_node_state(&node.status.conditions),
        template: spec.template_name.clone(),
    })
}

/// Assemble the detail view of a workflow from its record and node records
///
/// Nodes keep their input order. The first node that fails to convert fails
/// the whole detail.
pub fn convert_workflow_detail(
    workflow: &crd::Workflow,
    nodes: &[crd::WorkflowNode],
) -> Result<WorkflowDetail> {
    let nodes = nodes
        .iter()
        .map(convert_workflow_node)
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkflowDetail {
        workflow: convert_workflow(workflow),
        topology: Topology { nodes },
        kube_object: KubeObjectDesc {
            meta: KubeObjectMeta {
                name: workflow.metadata.name.clone(),
                namespace: workflow.metadata.namespace.clone(),
                labels: workflow.metadata.labels.clone(),
                annotations: workflow.metadata.annotations.clone(),
            },
            spec: workflow.spec.clone(),
        },
    })
}
