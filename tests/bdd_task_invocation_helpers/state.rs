//! Shared behavioural-test state for task-invocation scenarios.

use boshtask::harness::{CapturedOutput, ExecutionResult};
use boshtask::resolve::ParameterOverrides;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Step result type for task-invocation BDD tests.
pub type StepResult<T> = Result<T, String>;

/// How the mocked runtime responds to a run request.
#[derive(Debug, Clone)]
pub enum RunnerBehaviour {
    /// The child exits and leaves this output behind.
    Exits(CapturedOutput),
    /// The child does not exit within the timeout.
    TimesOut,
    /// The runtime program cannot be started.
    SpawnFails,
}

/// High-level outcome observed after an invocation.
#[derive(Debug, Clone)]
pub enum InvocationOutcome {
    /// The child ran to completion.
    Completed(ExecutionResult),

    /// The invocation failed with a classified failure kind and message.
    Failed {
        /// The failure category.
        kind: FailureKind,
        /// Human-readable error message.
        message: String,
    },
}

/// Categorized failure outcomes for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The child did not exit in time.
    Timeout,
    /// The runtime program could not be spawned.
    SpawnFailed,
    /// Any other failure kind.
    Other,
}

/// Shared scenario state for task-invocation behavioural tests.
#[derive(Default, ScenarioState)]
pub struct InvocationState {
    /// Container image passed to the runtime.
    pub(crate) image: Slot<String>,

    /// Whether the container is removed after it exits.
    pub(crate) remove: Slot<bool>,

    /// Caller-supplied overrides.
    pub(crate) overrides: Slot<ParameterOverrides>,

    /// Output the mocked runtime leaves behind when it exits.
    pub(crate) output: Slot<CapturedOutput>,

    /// How the mocked runtime responds.
    pub(crate) behaviour: Slot<RunnerBehaviour>,

    /// Arguments the mocked runtime was called with.
    pub(crate) captured_args: Slot<Vec<String>>,

    /// Outcome of the most recent invocation.
    pub(crate) outcome: Slot<InvocationOutcome>,
}

/// Fixture providing fresh state for each task-invocation scenario.
#[fixture]
pub fn invocation_state() -> InvocationState {
    let state = InvocationState::default();
    state.image.set(String::from("example/tasks:default"));
    state.remove.set(true);
    state.overrides.set(ParameterOverrides::new());
    state.output.set(CapturedOutput::default());
    state
}
