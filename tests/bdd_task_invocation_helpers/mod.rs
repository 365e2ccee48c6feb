//! Behavioural step helpers for task-invocation scenarios.

mod assertions;
mod state;

pub use state::{InvocationState, invocation_state};
