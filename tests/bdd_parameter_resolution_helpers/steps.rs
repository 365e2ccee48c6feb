//! Given/when step definitions for parameter-resolution behavioural scenarios.

use boshtask::resolve::resolve;
use boshtask::task::TaskDefinition;
use rstest_bdd_macros::{given, when};

use super::state::{ResolutionState, StepResult};

#[given("a task with run argument {argument}")]
fn task_with_run_argument(resolution_state: &ResolutionState, argument: String) {
    resolution_state.run_args.set(vec![argument]);
}

#[given("the task declares {name} with default {value}")]
fn task_declares_default(resolution_state: &ResolutionState, name: String, value: String) {
    let mut defaults = resolution_state.defaults.get().unwrap_or_default();
    defaults.insert(name, value);
    resolution_state.defaults.set(defaults);
}

#[given("the task declares {name} without a default")]
fn task_declares_blank_default(resolution_state: &ResolutionState, name: String) {
    let mut defaults = resolution_state.defaults.get().unwrap_or_default();
    defaults.insert(name, String::new());
    resolution_state.defaults.set(defaults);
}

#[given("the caller sets {name} to {value}")]
fn caller_sets_override(resolution_state: &ResolutionState, name: String, value: String) {
    let overrides = resolution_state
        .overrides
        .get()
        .unwrap_or_default()
        .with(name, value);
    resolution_state.overrides.set(overrides);
}

#[when("the task is resolved")]
fn task_is_resolved(resolution_state: &ResolutionState) -> StepResult<()> {
    let definition = TaskDefinition::new(
        "/opt/bosh-concourse-tasks/bin/bosh-task",
        resolution_state.run_args.get().unwrap_or_default(),
        resolution_state.defaults.get().unwrap_or_default(),
    )
    .map_err(|error| format!("task definition should be valid: {error}"))?;
    let overrides = resolution_state.overrides.get().unwrap_or_default();

    resolution_state
        .resolved
        .set(resolve(&definition, &overrides));
    Ok(())
}
