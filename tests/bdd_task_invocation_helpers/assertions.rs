//! Then-step assertions for task-invocation behavioural scenarios.

use boshtask::harness::ExecutionResult;
use rstest_bdd_macros::then;

use super::state::{FailureKind, InvocationOutcome, InvocationState, StepResult};

fn completed(invocation_state: &InvocationState) -> StepResult<ExecutionResult> {
    let outcome = invocation_state
        .outcome
        .get()
        .ok_or_else(|| String::from("invocation outcome should be set"))?;

    match outcome {
        InvocationOutcome::Completed(execution) => Ok(execution),
        InvocationOutcome::Failed { message, .. } => {
            Err(format!("expected completion, got failure: {message}"))
        }
    }
}

fn assert_failure_kind(invocation_state: &InvocationState, expected: FailureKind) -> StepResult<()> {
    let outcome = invocation_state
        .outcome
        .get()
        .ok_or_else(|| String::from("invocation outcome should be set"))?;

    match outcome {
        InvocationOutcome::Failed { kind, .. } if kind == expected => Ok(()),
        InvocationOutcome::Failed { kind, message } => Err(format!(
            "expected {expected:?} failure, got {kind:?}: {message}"
        )),
        InvocationOutcome::Completed(execution) => Err(format!(
            "expected {expected:?} failure, got exit code {}",
            execution.exit_code
        )),
    }
}

#[then("the runtime arguments are {arguments}")]
fn runtime_arguments_are(invocation_state: &InvocationState, arguments: String) -> StepResult<()> {
    let captured = invocation_state.captured_args.get().unwrap_or_default();
    let expected: Vec<&str> = arguments.split(',').collect();
    if captured == expected {
        return Ok(());
    }
    Err(format!("expected runtime arguments {expected:?}, got {captured:?}"))
}

#[then("the runtime arguments do not include {flag}")]
fn runtime_arguments_exclude(invocation_state: &InvocationState, flag: String) -> StepResult<()> {
    let captured = invocation_state.captured_args.get().unwrap_or_default();
    if captured.is_empty() {
        return Err(String::from("expected the runtime to be called"));
    }
    if captured.contains(&flag) {
        return Err(format!("expected {flag} to be absent from {captured:?}"));
    }
    Ok(())
}

#[then("the invocation completes with exit code {code}")]
fn invocation_completes_with_exit_code(
    invocation_state: &InvocationState,
    code: i32,
) -> StepResult<()> {
    let execution = completed(invocation_state)?;
    if execution.exit_code == code {
        return Ok(());
    }
    Err(format!(
        "expected exit code {code}, got {}",
        execution.exit_code
    ))
}

#[then("the observed arguments are {arguments}")]
fn observed_arguments_are(invocation_state: &InvocationState, arguments: String) -> StepResult<()> {
    let execution = completed(invocation_state)?;
    let expected: Vec<&str> = arguments.split(',').collect();
    if execution.observed_args == expected {
        return Ok(());
    }
    Err(format!(
        "expected observed arguments {expected:?}, got {:?}",
        execution.observed_args
    ))
}

#[then("the observed environment maps {name} to {value}")]
fn observed_environment_maps(
    invocation_state: &InvocationState,
    name: String,
    value: String,
) -> StepResult<()> {
    let execution = completed(invocation_state)?;
    match execution.observed_env.get(&name) {
        Some(actual) if *actual == value => Ok(()),
        Some(actual) => Err(format!("expected {name}={value}, got {name}={actual}")),
        None => Err(format!("expected {name} in the observed environment")),
    }
}

#[then("the invocation fails with a timeout")]
fn invocation_fails_with_timeout(invocation_state: &InvocationState) -> StepResult<()> {
    assert_failure_kind(invocation_state, FailureKind::Timeout)
}

#[then("the invocation fails to spawn the runtime")]
fn invocation_fails_to_spawn(invocation_state: &InvocationState) -> StepResult<()> {
    assert_failure_kind(invocation_state, FailureKind::SpawnFailed)
}
