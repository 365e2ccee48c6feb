//! Child process execution via `tokio::process`.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::{CapturedOutput, CommandRunner, ContainerCommand, RunCommandFuture};
use crate::error::ContainerError;

/// Runs container commands as local child processes.
///
/// The child inherits the caller's environment so the runtime can find its
/// daemon; task parameters travel only through `-e` arguments. On timeout the
/// child is left running: the invocation is reported as failed and not
/// retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    fn run(&self, command: &ContainerCommand, timeout: Duration) -> RunCommandFuture<'_> {
        let program = String::from(command.program());
        let args = command.args().to_vec();

        Box::pin(async move {
            let child = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|error| ContainerError::SpawnFailed {
                    program: program.clone(),
                    message: error.to_string(),
                })?;

            let output = tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| ContainerError::Timeout { timeout })?
                .map_err(|error| ContainerError::OutputCaptureFailed {
                    message: error.to_string(),
                })?;

            Ok(CapturedOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
