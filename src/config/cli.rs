//! Command-line argument definitions for boshtask.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::resolve::ParameterOverrides;

/// Command-line interface for boshtask.
#[derive(Debug, Parser)]
#[command(name = "boshtask")]
#[command(
    author,
    version,
    about = "Resolve and exercise declarative BOSH task definitions inside containers"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container runtime program.
    #[arg(long, global = true)]
    pub runtime: Option<String>,

    /// Container image to run tasks in.
    #[arg(long, global = true)]
    pub image: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the task definitions in the tasks directory.
    List,

    /// Print the resolved environment and arguments for a task.
    Resolve(TaskArgs),

    /// Run a task in a container and report what it received.
    Run(TaskArgs),
}

/// Arguments shared by `resolve` and `run`.
#[derive(Debug, Parser)]
pub struct TaskArgs {
    /// Task name in the tasks directory, or a path to a definition file.
    #[arg(required = true)]
    pub task: String,

    /// Parameter override in `name=value` form; may be repeated.
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl TaskArgs {
    /// Collect the parameter flags into an override set.
    ///
    /// A name given more than once keeps its last value.
    #[must_use]
    pub fn overrides(&self) -> ParameterOverrides {
        self.params.iter().cloned().collect()
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    ParameterOverrides::parse_assignment(raw).map_err(|e| e.to_string())
}
