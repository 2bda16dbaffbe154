//! Workflow resource types
//!
//! A `Workflow` declares the entry template and the set of named templates
//! the controller instantiates into `WorkflowNode` resources as it runs.

use crate::{CrdError, ObjectMeta, Result, StressChaosSpec, TypeMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Workflow resource describing a graph of chaos actions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Type metadata (apiVersion, kind)
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    /// Object metadata (name, namespace, labels, etc.)
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Workflow specification
    pub spec: WorkflowSpec,

    /// Workflow status (set by controller)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
}

impl Workflow {
    /// Create a new Workflow
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        entry: impl Into<String>,
    ) -> Self {
        Self {
            type_meta: TypeMeta::workflow(),
            metadata: ObjectMeta::with_namespace(name, namespace),
            spec: WorkflowSpec {
                entry: entry.into(),
                templates: Vec::new(),
            },
            status: None,
        }
    }

    /// Add a template
    pub fn with_template(mut self, template: Template) -> Self {
        self.spec.templates.push(template);
        self
    }

    /// Look up a template by name
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.spec.templates.iter().find(|t| t.name == name)
    }

    /// Validate the workflow
    pub fn validate(&self) -> Result<()> {
        if self.metadata.name.is_empty() {
            return Err(CrdError::MissingField("metadata.name".to_string()));
        }

        if self.spec.entry.is_empty() {
            return Err(CrdError::MissingField("spec.entry".to_string()));
        }

        if !self.spec.templates.is_empty() && self.template(&self.spec.entry).is_none() {
            return Err(CrdError::InvalidFieldValue {
                field: "spec.entry".to_string(),
                message: format!("no template named '{}'", self.spec.entry),
            });
        }

        Ok(())
    }
}

/// Workflow specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    /// Name of the template execution starts from
    pub entry: String,

    #[serde(default)]
    pub templates: Vec<Template>,
}

/// A named template a node gets instantiated from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,

    pub template_type: TemplateType,

    /// Deadline as a duration string, e.g. "5m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    /// Child template names for Serial and Parallel templates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    /// Action-specific spec for chaos templates
    #[serde(flatten)]
    pub embed_chaos: EmbedChaos,
}

impl Template {
    /// Create a template with no children and no embedded chaos
    pub fn new(name: impl Into<String>, template_type: TemplateType) -> Self {
        Self {
            name: name.into(),
            template_type,
            deadline: None,
            children: Vec::new(),
            embed_chaos: EmbedChaos::default(),
        }
    }

    /// Add a child template
    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Declared type of a template or workflow node
///
/// Values this crate does not know are kept as `Unknown` so that decoding a
/// resource never fails on a newer kind; consumers decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateType {
    Serial,
    Parallel,
    Suspend,
    AwsChaos,
    DnsChaos,
    GcpChaos,
    HttpChaos,
    IoChaos,
    JvmChaos,
    KernelChaos,
    NetworkChaos,
    PodChaos,
    StressChaos,
    TimeChaos,
    Unknown(String),
}

impl TemplateType {
    /// Wire name of the type
    pub fn as_str(&self) -> &str {
        match self {
            TemplateType::Serial => "Serial",
            TemplateType::Parallel => "Parallel",
            TemplateType::Suspend => "Suspend",
            TemplateType::AwsChaos => "AwsChaos",
            TemplateType::DnsChaos => "DNSChaos",
            TemplateType::GcpChaos => "GcpChaos",
            TemplateType::HttpChaos => "HTTPChaos",
            TemplateType::IoChaos => "IoChaos",
            TemplateType::JvmChaos => "JVMChaos",
            TemplateType::KernelChaos => "KernelChaos",
            TemplateType::NetworkChaos => "NetworkChaos",
            TemplateType::PodChaos => "PodChaos",
            TemplateType::StressChaos => "StressChaos",
            TemplateType::TimeChaos => "TimeChaos",
            TemplateType::Unknown(other) => other,
        }
    }

    /// Key under which the action-specific spec of a chaos type is embedded
    pub fn embed_key(&self) -> Option<&'static str> {
        match self {
            TemplateType::AwsChaos => Some("awsChaos"),
            TemplateType::DnsChaos => Some("dnsChaos"),
            TemplateType::GcpChaos => Some("gcpChaos"),
            TemplateType::HttpChaos => Some("httpChaos"),
            TemplateType::IoChaos => Some("ioChaos"),
            TemplateType::JvmChaos => Some("jvmChaos"),
            TemplateType::KernelChaos => Some("kernelChaos"),
            TemplateType::NetworkChaos => Some("networkChaos"),
            TemplateType::PodChaos => Some("podChaos"),
            TemplateType::StressChaos => Some("stressChaos"),
            TemplateType::TimeChaos => Some("timeChaos"),
            TemplateType::Serial
            | TemplateType::Parallel
            | TemplateType::Suspend
            | TemplateType::Unknown(_) => None,
        }
    }

    /// Whether this is a fault-injection leaf
    pub fn is_chaos(&self) -> bool {
        self.embed_key().is_some()
    }
}

impl From<String> for TemplateType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Serial" => TemplateType::Serial,
            "Parallel" => TemplateType::Parallel,
            "Suspend" => TemplateType::Suspend,
            "AwsChaos" => TemplateType::AwsChaos,
            "DNSChaos" => TemplateType::DnsChaos,
            "GcpChaos" => TemplateType::GcpChaos,
            "HTTPChaos" => TemplateType::HttpChaos,
            "IoChaos" => TemplateType::IoChaos,
            "JVMChaos" => TemplateType::JvmChaos,
            "KernelChaos" => TemplateType::KernelChaos,
            "NetworkChaos" => TemplateType::NetworkChaos,
            "PodChaos" => TemplateType::PodChaos,
            "StressChaos" => TemplateType::StressChaos,
            "TimeChaos" => TemplateType::TimeChaos,
            _ => TemplateType::Unknown(value),
        }
    }
}

impl From<&str> for TemplateType {
    fn from(value: &str) -> Self {
        TemplateType::from(value.to_string())
    }
}

impl From<TemplateType> for String {
    fn from(value: TemplateType) -> Self {
        match value {
            TemplateType::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action-specific spec embedded inline in a template or node
///
/// Kept as raw JSON keyed by the embed key (`networkChaos`, `stressChaos`,
/// ...). Only `stress_chaos` decodes anything, and only on request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct EmbedChaos(pub BTreeMap<String, serde_json::Value>);

impl EmbedChaos {
    /// Raw embedded spec for the given chaos type
    pub fn get(&self, template_type: &TemplateType) -> Option<&serde_json::Value> {
        template_type.embed_key().and_then(|key| self.0.get(key))
    }

    /// Embed a spec for the given chaos type
    pub fn insert(&mut self, template_type: &TemplateType, spec: serde_json::Value) -> Result<()> {
        let key = template_type.embed_key().ok_or_else(|| CrdError::InvalidFieldValue {
            field: "templateType".to_string(),
            message: format!("'{}' does not embed a chaos spec", template_type),
        })?;
        self.0.insert(key.to_string(), spec);
        Ok(())
    }

    /// Decode the embedded StressChaos spec, if there is one
    pub fn stress_chaos(&self) -> Result<Option<StressChaosSpec>> {
        match self.get(&TemplateType::StressChaos) {
            Some(raw) => Ok(Some(serde_json::from_value(raw.clone())?)),
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Workflow status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatus {
    /// Name of the node created for the entry template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_node: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}
