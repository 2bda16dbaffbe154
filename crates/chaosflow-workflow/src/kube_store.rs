//! Repository backed by the Kubernetes API
//!
//! Workflows and workflow nodes are read as dynamic objects and decoded into
//! the `chaosflow-crd` types, so no generated CRD bindings are needed.

use crate::convert::{convert_workflow, convert_workflow_detail};
use crate::error::{Result, WorkflowError};
use crate::model::{Workflow, WorkflowDetail};
use crate::store::WorkflowRepository;
use async_trait::async_trait;
use chaosflow_crd as crd;
use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, GroupVersionKind, ListParams};
use kube::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Repository reading chaos resources from a cluster
#[derive(Clone)]
pub struct KubeWorkflowStore {
    client: Client,
    workflows: ApiResource,
    nodes: ApiResource,
}

impl KubeWorkflowStore {
    /// Create a store using an existing client
    pub fn new(client: Client) -> Self {
        let resource = |kind: &str| {
            ApiResource::from_gvk(&GroupVersionKind::gvk(crd::API_GROUP, crd::VERSION, kind))
        };
        Self {
            client,
            workflows: resource("Workflow"),
            nodes: resource("WorkflowNode"),
        }
    }

    /// Create a store from the environment (KUBECONFIG or in-cluster config)
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default().await?;
        info!("Kubernetes client initialized");
        Ok(Self::new(client))
    }

    fn workflow_api(&self, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &self.workflows),
            None => Api::all_with(self.client.clone(), &self.workflows),
        }
    }

    fn node_api(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &self.nodes)
    }

    async fn list_in(&self, namespace: Option<&str>) -> Result<Vec<Workflow>> {
        let list = self
            .workflow_api(namespace)
            .list(&ListParams::default())
            .await?;
        debug!(
            "Listed {} workflows in {}",
            list.items.len(),
            namespace.unwrap_or("all namespaces")
        );

        list.items
            .iter()
            .map(|obj| decode::<crd::Workflow>(obj).map(|wf| convert_workflow(&wf)))
            .collect()
    }
}

/// Decode a dynamic object into a typed resource
fn decode<T: DeserializeOwned>(obj: &DynamicObject) -> Result<T> {
    Ok(serde_json::from_value(serde_json::to_value(obj)?)?)
}

fn not_found(err: kube::Error, namespace: &str, name: &str) -> WorkflowError {
    match err {
        kube::Error::Api(response) if response.code == 404 => WorkflowError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => WorkflowError::Kube(other),
    }
}

#[async_trait]
impl WorkflowRepository for KubeWorkflowStore {
    async fn list_workflows(&self, namespace: &str) -> Result<Vec<Workflow>> {
        self.list_in(Some(namespace)).await
    }

    async fn list_all_workflows(&self) -> Result<Vec<Workflow>> {
        self.list_in(None).await
    }

    async fn get_workflow_detail(&self, namespace: &str, name: &str) -> Result<WorkflowDetail> {
        let obj = self
            .workflow_api(Some(namespace))
            .get(name)
            .await
            .map_err(|e| not_found(e, namespace, name))?;
        let workflow: crd::Workflow = decode(&obj)?;

        let selector = format!("{}={}", crd::LABEL_WORKFLOW, name);
        let list = self
            .node_api(namespace)
            .list(&ListParams::default().labels(&selector))
            .await?;
        let nodes = list
            .items
            .iter()
            .map(decode::<crd::WorkflowNode>)
            .collect::<Result<Vec<_>>>()?;
        debug!("Assembling {}/{} from {} nodes", namespace, name, nodes.len());

        convert_workflow_detail(&workflow, &nodes)
    }

    async fn delete_workflow(&self, namespace: &str, name: &str) -> Result<()> {
        self.workflow_api(Some(namespace))
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| not_found(e, namespace, name))?;
        info!("Deleted workflow {}/{}", namespace, name);
        Ok(())
    }
}
