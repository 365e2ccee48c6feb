//! Then-step assertions for parameter-resolution behavioural scenarios.

use boshtask::resolve::ResolvedInvocation;
use rstest_bdd_macros::then;

use super::state::{ResolutionState, StepResult};

fn resolved(resolution_state: &ResolutionState) -> StepResult<ResolvedInvocation> {
    resolution_state
        .resolved
        .get()
        .ok_or_else(|| String::from("resolution outcome should be set"))
}

#[then("the environment maps {name} to {value}")]
fn environment_maps(
    resolution_state: &ResolutionState,
    name: String,
    value: String,
) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    match invocation.environment().get(&name) {
        Some(actual) if *actual == value => Ok(()),
        Some(actual) => Err(format!("expected {name}={value}, got {name}={actual}")),
        None => Err(format!("expected {name} in the environment")),
    }
}

#[then("the environment keeps {name} with an empty value")]
fn environment_keeps_empty(resolution_state: &ResolutionState, name: String) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    match invocation.environment().get(&name) {
        Some(actual) if actual.is_empty() => Ok(()),
        Some(actual) => Err(format!("expected {name} to be empty, got {actual}")),
        None => Err(format!("expected {name} in the environment")),
    }
}

#[then("the environment has {count} entries")]
fn environment_has_entries(resolution_state: &ResolutionState, count: usize) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    let actual = invocation.environment().len();
    if actual == count {
        return Ok(());
    }
    Err(format!(
        "expected {count} environment entries, got {actual}: {:?}",
        invocation.env_entries()
    ))
}

#[then("the environment does not contain {name}")]
fn environment_does_not_contain(
    resolution_state: &ResolutionState,
    name: String,
) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    if invocation.environment().contains_key(&name) {
        return Err(format!("expected {name} to be absent from the environment"));
    }
    Ok(())
}

#[then("the arguments are {arguments}")]
fn arguments_are(resolution_state: &ResolutionState, arguments: String) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    let expected: Vec<&str> = arguments.split(',').collect();
    if invocation.arguments() == expected.as_slice() {
        return Ok(());
    }
    Err(format!(
        "expected arguments {expected:?}, got {:?}",
        invocation.arguments()
    ))
}

#[then("the control parameter {name} is {value}")]
fn control_parameter_is(
    resolution_state: &ResolutionState,
    name: String,
    value: String,
) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    match invocation.control().get(&name) {
        Some(actual) if actual == value => Ok(()),
        Some(actual) => Err(format!("expected control {name}={value}, got {actual}")),
        None => Err(format!("expected control parameter {name}")),
    }
}

#[then("the forced exit code is {code}")]
fn forced_exit_code_is(resolution_state: &ResolutionState, code: i32) -> StepResult<()> {
    let invocation = resolved(resolution_state)?;
    match invocation.control().forced_exit_code() {
        Some(actual) if actual == code => Ok(()),
        other => Err(format!("expected forced exit code {code}, got {other:?}")),
    }
}
