//! `boshtask` application entry point.
//!
//! Domain errors stay inside the command handlers; this boundary converts
//! them into `eyre::Report` for human-readable output. A task's own exit
//! code is not an error and becomes the process exit code of `run`.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/boshtask/config.toml` or path from `BOSHTASK_CONFIG_PATH`)
//! 3. Environment variables (`BOSHTASK_*`)
//! 4. Command-line arguments

use std::process::ExitCode;

use boshtask::config::{AppConfig, Cli, Commands, TaskArgs, load_config};
use boshtask::error::Result as BoshTaskResult;
use boshtask::harness::{Harness, RuntimeResolver, RuntimeSettings, TokioCommandRunner};
use boshtask::resolve::resolve;
use boshtask::task::{TaskCatalog, TaskDefinition, load_task, locate_task};
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).await.map_err(Report::from)
}

/// Install the stderr log subscriber.
///
/// `-v` forces debug output; otherwise `RUST_LOG` applies, defaulting to
/// `info`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
async fn run(cli: &Cli, config: &AppConfig) -> BoshTaskResult<ExitCode> {
    match &cli.command {
        Commands::List => list_tasks(config),
        Commands::Resolve(args) => print_resolution(config, args),
        Commands::Run(args) => run_task(config, args).await,
    }
}

fn load_definition(config: &AppConfig, args: &TaskArgs) -> BoshTaskResult<TaskDefinition> {
    let path = locate_task(&args.task, &config.harness.tasks_dir);
    load_task(&path)
}

/// List the task definitions in the tasks directory.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn list_tasks(config: &AppConfig) -> BoshTaskResult<ExitCode> {
    let catalog = TaskCatalog::open(config.harness.tasks_dir.clone())?;
    debug!(dir = %catalog.dir(), "listing tasks");
    for name in catalog.names() {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the resolved invocation without running it.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_resolution(config: &AppConfig, args: &TaskArgs) -> BoshTaskResult<ExitCode> {
    let definition = load_definition(config, args)?;
    let invocation = resolve(&definition, &args.overrides());

    println!("path: {}", definition.run().path());
    for entry in invocation.env_entries() {
        println!("env: {entry}");
    }
    for entry in invocation.control().entries() {
        println!("control: {entry}");
    }
    for argument in invocation.arguments() {
        println!("arg: {argument}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Run a task in a container and report what it received.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn run_task(config: &AppConfig, args: &TaskArgs) -> BoshTaskResult<ExitCode> {
    let definition = load_definition(config, args)?;
    let env = mockable::DefaultEnv::new();
    let settings = RuntimeSettings::from_config(config, &RuntimeResolver::new(&env));
    let harness = Harness::new(TokioCommandRunner, settings);
    info!(
        task = %args.task,
        runtime = harness.settings().program(),
        image = harness.settings().image(),
        "running task"
    );

    let result = harness.run_task(&definition, &args.overrides()).await?;

    for (name, value) in &result.observed_env {
        println!("env: {name}={value}");
    }
    for argument in &result.observed_args {
        println!("arg: {argument}");
    }
    info!(exit_code = result.exit_code, "task finished");

    Ok(u8::try_from(result.exit_code).map_or(ExitCode::FAILURE, ExitCode::from))
}
