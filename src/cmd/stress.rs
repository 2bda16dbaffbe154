use chaosflow_crd as crd;
use clap::Args;
use color_eyre::eyre::{bail, Result, WrapErr};
use std::path::PathBuf;
use tracing::{debug, info};

use super::{decode, kind_of, load_manifests};

#[derive(Args, Debug)]
pub struct StressArgs {
    /// File holding a StressChaos, Workflow or WorkflowNode manifest
    pub file: PathBuf,

    /// Only compile the template with this name (Workflow manifests)
    #[arg(short, long)]
    pub template: Option<String>,
}

pub fn run(args: StressArgs) -> Result<()> {
    let mut compiled = 0;

    for manifest in load_manifests(&args.file)? {
        let kind = kind_of(&manifest).to_string();
        match kind.as_str() {
            "StressChaos" => {
                let chaos: crd::StressChaos = decode(manifest, &args.file)?;
                emit(&chaos.metadata.name, &chaos.spec)?;
                compiled += 1;
            }
            "Workflow" => {
                let workflow: crd::Workflow = decode(manifest, &args.file)?;
                for template in &workflow.spec.templates {
                    if args.template.as_deref().is_some_and(|t| t != template.name) {
                        continue;
                    }
                    if let Some(spec) = template.embed_chaos.stress_chaos()? {
                        emit(&template.name, &spec)?;
                        compiled += 1;
                    }
                }
            }
            "WorkflowNode" => {
                let node: crd::WorkflowNode = decode(manifest, &args.file)?;
                if let Some(spec) = node.spec.embed_chaos.stress_chaos()? {
                    emit(&node.metadata.name, &spec)?;
                    compiled += 1;
                }
            }
            other => debug!("Ignoring manifest of kind '{}'", other),
        }
    }

    if compiled == 0 {
        bail!("No stress chaos found in {}", args.file.display());
    }
    info!("Compiled {} stress specs", compiled);
    Ok(())
}

fn emit(name: &str, spec: &crd::StressChaosSpec) -> Result<()> {
    if spec.raw_stressors().is_none() {
        if let Some(stressors) = &spec.stressors {
            stressors
                .validate()
                .wrap_err_with(|| format!("Invalid stressors in {}", name))?;
        }
    }
    let args = spec
        .stress_args()
        .wrap_err_with(|| format!("Failed to compile stressors of {}", name))?;
    debug!("Stressors of {}: {:?}", name, args);
    println!("{}", args.trim());
    Ok(())
}
