use chaosflow_crd as crd;
use chaosflow_workflow::convert_workflow_detail;
use clap::Args;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{decode, kind_of, load_manifests, print, OutputFormat};

#[derive(Args, Debug)]
pub struct DetailArgs {
    /// File holding the Workflow manifest
    #[arg(short, long)]
    pub workflow: PathBuf,

    /// Files holding WorkflowNode manifests (repeatable)
    #[arg(short, long)]
    pub nodes: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

pub fn run(args: DetailArgs) -> Result<()> {
    let workflow_manifest = load_manifests(&args.workflow)?
        .into_iter()
        .find(|m| kind_of(m) == "Workflow" || kind_of(m).is_empty())
        .ok_or_else(|| eyre!("No Workflow manifest in {}", args.workflow.display()))?;
    let workflow: crd::Workflow = decode(workflow_manifest, &args.workflow)?;

    if let Err(e) = workflow.validate() {
        warn!("Workflow {} looks incomplete: {}", workflow.metadata.name, e);
    }

    let mut nodes: Vec<crd::WorkflowNode> = Vec::new();
    for path in &args.nodes {
        for manifest in load_manifests(path)? {
            let node: crd::WorkflowNode = decode(manifest, path)?;
            if !belongs_to(&node, &workflow) {
                debug!(
                    "Skipping node {} of workflow {}/{}",
                    node.metadata.name,
                    node.metadata.namespace.as_deref().unwrap_or_default(),
                    node.spec.workflow_name
                );
                continue;
            }
            nodes.push(node);
        }
    }
    info!(
        "Assembling workflow {} from {} nodes",
        workflow.metadata.name,
        nodes.len()
    );

    let detail = convert_workflow_detail(&workflow, &nodes)
        .wrap_err_with(|| format!("Failed to assemble workflow {}", workflow.metadata.name))?;
    print(&detail, args.output)
}

/// Namespace and workflow name must both match; a missing namespace is ""
fn belongs_to(node: &crd::WorkflowNode, workflow: &crd::Workflow) -> bool {
    fn namespace(meta: &crd::ObjectMeta) -> &str {
        meta.namespace.as_deref().unwrap_or_default()
    }

    node.spec.workflow_name == workflow.metadata.name
        && namespace(&node.metadata) == namespace(&workflow.metadata)
}
