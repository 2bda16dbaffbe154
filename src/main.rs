// Command-line front end for inspecting chaos workflows
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use std::io::stderr; // Logs go to stderr, output to stdout

mod cmd;

use cmd::cluster::{DeleteArgs, GetArgs, ListArgs};
use cmd::detail::DetailArgs;
use cmd::stress::StressArgs;

// Define the command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Chaos workflow inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

// Define the subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Builds a workflow detail from local Workflow and WorkflowNode manifests.
    Detail(DetailArgs),
    /// Fetches a workflow and its nodes from the cluster.
    Get(GetArgs),
    /// Lists workflows in the cluster.
    List(ListArgs),
    /// Deletes a workflow from the cluster.
    Delete(DeleteArgs),
    /// Prints the stress-ng arguments for a StressChaos manifest.
    Stress(StressArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --- Logging Initialization ---
    // Respect RUST_LOG, fall back to verbose/info for our crates
    let level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "chaosflow={level},chaosflow_workflow={level},kube=warn,hyper=warn,tower=warn,rustls=warn,h2=warn",
        level = level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry().with(filter).with(fmt::layer().with_writer(stderr)).init();
    debug!("Logger initialized");

    match cli.command {
        Commands::Detail(args) => cmd::detail::run(args),
        Commands::Get(args) => cmd::cluster::run_get(args).await,
        Commands::List(args) => cmd::cluster::run_list(args).await,
        Commands::Delete(args) => cmd::cluster::run_delete(args).await,
        Commands::Stress(args) => cmd::stress::run(args),
    }
}
