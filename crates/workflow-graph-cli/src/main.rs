//! wfgraph - validate, lay out and order workflow graph snapshots

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use workflow_graph::{
    catalog, execution_plan, validate_workflow_with, EngineConfig, GraphError, LineageGraph,
    WorkflowGraph,
};

#[derive(Parser)]
#[command(name = "wfgraph")]
#[command(about = "Validate and lay out dataset workflow graphs")]
#[command(version)]
struct Cli {
    /// Engine config file (connectivity policy, layout spacing)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workflow graph; exits non-zero if it has errors
    Validate {
        /// Path to the graph JSON file
        file: PathBuf,
    },

    /// Print the lineage layout of a workflow graph
    Layout {
        /// Path to the graph JSON file
        file: PathBuf,
    },

    /// Print the execution plan (batches by level) of a workflow graph
    Order {
        /// Path to the graph JSON file
        file: PathBuf,
    },

    /// List every node kind with its required fields
    Catalog,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, GraphError> {
    let config = EngineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { file } => {
            let graph = load_graph(&file)?;
            let result = validate_workflow_with(&graph, &config.policy);
            print_json(&result)?;

            if result.valid {
                log::info!(
                    "Workflow is valid ({} warning(s))",
                    result.warning_count()
                );
                Ok(ExitCode::SUCCESS)
            } else {
                log::warn!("Workflow has {} error(s)", result.error_count());
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Layout { file } => {
            let graph = load_graph(&file)?;
            print_json(&LineageGraph::build(&graph, &config.layout))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Order { file } => {
            let graph = load_graph(&file)?;
            print_json(&execution_plan(&graph)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Catalog => {
            print_json(&catalog())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_graph(path: &Path) -> Result<WorkflowGraph, GraphError> {
    let json = std::fs::read_to_string(path)?;
    let graph = WorkflowGraph::from_json(&json)?;
    log::info!(
        "Loaded {:?}: {} node(s), {} edge(s)",
        path,
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), GraphError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
