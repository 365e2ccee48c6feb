//! Container invocation harness.
//!
//! The harness turns a [`ResolvedInvocation`] into a container runtime
//! command line, runs it once, and reconstructs what the target received
//! from the diagnostic lines it echoes (`env: NAME=VALUE`, `arg: VALUE`).
//! The container boundary rules out inspecting the child's argv or environ
//! directly.
//!
//! Process execution sits behind [`CommandRunner`] so the command shape and
//! exit-code handling can be unit-tested without a container runtime.

mod report;
mod runner;
mod runtime;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

pub use self::report::{DiagnosticReport, parse_diagnostics};
pub use self::runner::TokioCommandRunner;
pub use self::runtime::{DEFAULT_RUNTIME, RuntimeResolver};
use crate::config::AppConfig;
use crate::error::{BoshTaskError, ConfigError, ContainerError};
use crate::resolve::{ParameterOverrides, ResolvedInvocation, resolve};
use crate::task::TaskDefinition;

/// Image providing the task scripts and a diagnostic stand-in for `bosh`.
pub const DEFAULT_IMAGE: &str = "dpb587/bosh-concourse-tasks:master-spec";

/// Upper bound on a single invocation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Boxed future type returned by [`CommandRunner::run`].
pub type RunCommandFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CapturedOutput, ContainerError>> + Send + 'a>>;

/// Behaviour required to run one container command to completion.
pub trait CommandRunner {
    /// Run `command`, waiting at most `timeout` for it to exit.
    fn run(&self, command: &ContainerCommand, timeout: Duration) -> RunCommandFuture<'_>;
}

/// How the container runtime is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    program: String,
    image: String,
    remove: bool,
    timeout: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            program: String::from(DEFAULT_RUNTIME),
            image: String::from(DEFAULT_IMAGE),
            remove: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RuntimeSettings {
    /// Build settings from application configuration.
    ///
    /// The runtime program falls back through `resolver` when the
    /// configuration leaves it unset.
    #[must_use]
    pub fn from_config<E: mockable::Env>(config: &AppConfig, resolver: &RuntimeResolver<'_, E>) -> Self {
        Self {
            program: resolver.resolve(config.runtime.as_deref()),
            image: config
                .image
                .clone()
                .unwrap_or_else(|| String::from(DEFAULT_IMAGE)),
            remove: config.container.remove,
            timeout: Duration::from_secs(config.harness.timeout_secs),
        }
    }

    /// Set the runtime program.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the container image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Control whether the container is removed after it exits.
    #[must_use]
    pub const fn with_remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Set the invocation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return the runtime program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Return the container image.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Return whether the container is removed after it exits.
    #[must_use]
    pub const fn remove(&self) -> bool {
        self.remove
    }

    /// Return the invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A fully assembled container runtime command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCommand {
    program: String,
    args: Vec<String>,
}

impl ContainerCommand {
    /// Assemble `run [--rm] (-e NAME=VALUE)* IMAGE TARGET ARGS...`.
    ///
    /// Environment entries come first in name order, then control entries.
    #[must_use]
    pub fn build(settings: &RuntimeSettings, invocation: &ResolvedInvocation, target: &str) -> Self {
        let mut args = vec![String::from("run")];
        if settings.remove() {
            args.push(String::from("--rm"));
        }
        for entry in invocation
            .env_entries()
            .into_iter()
            .chain(invocation.control().entries())
        {
            args.push(String::from("-e"));
            args.push(entry);
        }
        args.push(String::from(settings.image()));
        args.push(String::from(target));
        args.extend(invocation.arguments().iter().cloned());

        Self {
            program: String::from(settings.program()),
            args,
        }
    }

    /// Return the runtime program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Return the runtime arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Raw output collected from a finished child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code, or `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CapturedOutput {
    /// Return stdout followed by stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// The observed outcome of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The child's exit code, unaltered.
    pub exit_code: i32,
    /// Environment the target reported receiving.
    pub observed_env: BTreeMap<String, String>,
    /// Arguments the target reported receiving, in received order.
    pub observed_args: Vec<String>,
}

/// Runs resolved invocations inside a container.
pub struct Harness<R: CommandRunner> {
    runner: R,
    settings: RuntimeSettings,
}

impl<R: CommandRunner> Harness<R> {
    /// Create a harness from a runner and runtime settings.
    #[must_use]
    pub const fn new(runner: R, settings: RuntimeSettings) -> Self {
        Self { runner, settings }
    }

    /// Return the runtime settings.
    #[must_use]
    pub const fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Run `invocation` with `target` as the executable inside the container.
    ///
    /// A nonzero exit code is a normal result and is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `target` is blank, and
    /// `ContainerError` when the runtime cannot be spawned, does not exit
    /// within the timeout, or exits without an exit code.
    pub async fn invoke(
        &self,
        invocation: &ResolvedInvocation,
        target: &str,
    ) -> Result<ExecutionResult, BoshTaskError> {
        if target.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("target"),
            }
            .into());
        }

        if let Some(code) = invocation.control().forced_exit_code() {
            debug!(forced_exit_code = code, "target is asked to fail");
        }

        let command = ContainerCommand::build(&self.settings, invocation, target);
        debug!(
            program = command.program(),
            args = ?command.args(),
            "running container invocation"
        );

        let captured = self
            .runner
            .run(&command, self.settings.timeout())
            .await
            .inspect_err(|error| {
                if matches!(error, ContainerError::Timeout { .. }) {
                    warn!(target_path = target, "container invocation timed out");
                }
            })?;

        let exit_code = captured.exit_code.ok_or_else(|| ContainerError::Terminated {
            program: String::from(command.program()),
        })?;
        let report = parse_diagnostics(&captured.combined());
        debug!(exit_code, "container invocation finished");

        Ok(ExecutionResult {
            exit_code,
            observed_env: report.env,
            observed_args: report.args,
        })
    }

    /// Resolve `definition` against `overrides` and run it.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::invoke`].
    pub async fn run_task(
        &self,
        definition: &TaskDefinition,
        overrides: &ParameterOverrides,
    ) -> Result<ExecutionResult, BoshTaskError> {
        let invocation = resolve(definition, overrides);
        self.invoke(&invocation, definition.run().path()).await
    }

    /// Run `invocation` using a caller runtime handle.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::invoke`].
    pub fn invoke_blocking(
        &self,
        runtime: &tokio::runtime::Handle,
        invocation: &ResolvedInvocation,
        target: &str,
    ) -> Result<ExecutionResult, BoshTaskError> {
        runtime.block_on(self.invoke(invocation, target))
    }
}
