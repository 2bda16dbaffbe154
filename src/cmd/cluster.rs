use chaosflow_workflow::{KubeWorkflowStore, WorkflowRepository};
use clap::Args;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use super::{print, OutputFormat};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Workflow name
    pub name: String,

    /// Namespace of the workflow
    #[arg(short, long, env = "CHAOSFLOW_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Namespace to list
    #[arg(short, long, env = "CHAOSFLOW_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// List across all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Workflow name
    pub name: String,

    /// Namespace of the workflow
    #[arg(short, long, env = "CHAOSFLOW_NAMESPACE", default_value = "default")]
    pub namespace: String,
}

async fn connect() -> Result<KubeWorkflowStore> {
    KubeWorkflowStore::try_default()
        .await
        .wrap_err("Failed to create Kubernetes client. Is KUBECONFIG configured?")
}

pub async fn run_get(args: GetArgs) -> Result<()> {
    let store = connect().await?;
    let detail = store
        .get_workflow_detail(&args.namespace, &args.name)
        .await
        .wrap_err_with(|| format!("Failed to get workflow {}/{}", args.namespace, args.name))?;
    print(&detail, args.output)
}

pub async fn run_list(args: ListArgs) -> Result<()> {
    let store = connect().await?;
    let workflows = if args.all_namespaces {
        store.list_all_workflows().await
    } else {
        store.list_workflows(&args.namespace).await
    }
    .wrap_err("Failed to list workflows")?;
    print(&workflows, args.output)
}

pub async fn run_delete(args: DeleteArgs) -> Result<()> {
    let store = connect().await?;
    store
        .delete_workflow(&args.namespace, &args.name)
        .await
        .wrap_err_with(|| format!("Failed to delete workflow {}/{}", args.namespace, args.name))?;
    info!("Workflow {}/{} deleted", args.namespace, args.name);
    Ok(())
}
