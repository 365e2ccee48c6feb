//! Parameter resolution.
//!
//! Resolution merges a definition's declared defaults with caller overrides
//! and derives the environment and argument vector for one invocation. The
//! merge is total: every default that is not overridden is passed through,
//! and no key is ever dropped.
//!
//! Keys beginning with [`CONTROL_PREFIX`] are control parameters. They are
//! kept apart from the environment and forwarded to the target separately
//! (for example to force a failure exit code in a test double).

mod derived;


use std::collections::BTreeMap;

use crate::error::{BoshTaskError, ConfigError};
use crate::task::TaskDefinition;

pub use derived::{InstanceSelector, derived_arguments};

/// Prefix marking a parameter as a control key.
pub const CONTROL_PREFIX: char = '_';

/// Control key holding an exit code the target should fail with.
pub const FORCED_EXIT_KEY: &str = "_test_bosh_exit";

/// Caller-supplied parameter values.
///
/// Keys present here take precedence over the definition's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    values: BTreeMap<String, String>,
}

impl ParameterOverrides {
    /// Create an empty override set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Set one override, replacing any earlier value for the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set one override in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Parse a `name=value` assignment.
    ///
    /// The split happens at the first `=`, so values may themselves contain
    /// `=` and may be empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when there is no `=` or the name
    /// is empty.
    pub fn parse_assignment(assignment: &str) -> Result<(String, String), BoshTaskError> {
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(ConfigError::InvalidValue {
                field: String::from("param"),
                reason: format!("expected name=value, got '{assignment}'"),
            }
            .into());
        };
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("param"),
                reason: format!("parameter name must not be empty in '{assignment}'"),
            }
            .into());
        }
        Ok((String::from(name), String::from(value)))
    }

    /// Return the override for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Return whether no overrides are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate overrides in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Control parameters split out of the merged set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlParams {
    values: BTreeMap<String, String>,
}

impl ControlParams {
    /// Return the exit code the target is asked to fail with, if any.
    ///
    /// Values that are not integers are ignored here; they are still
    /// forwarded to the target verbatim.
    #[must_use]
    pub fn forced_exit_code(&self) -> Option<i32> {
        self.values
            .get(FORCED_EXIT_KEY)
            .and_then(|raw| raw.trim().parse().ok())
    }

    /// Render entries as `NAME=VALUE` in name order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        render_entries(&self.values)
    }

    /// Return whether no control parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the control value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// The environment and arguments for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInvocation {
    environment: BTreeMap<String, String>,
    arguments: Vec<String>,
    control: ControlParams,
}

impl ResolvedInvocation {
    /// Return the resolved environment, excluding control keys.
    #[must_use]
    pub const fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Render the environment as `NAME=VALUE` entries in name order.
    #[must_use]
    pub fn env_entries(&self) -> Vec<String> {
        render_entries(&self.environment)
    }

    /// Return the argument vector: fixed run args, then derived arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Return the control parameters.
    #[must_use]
    pub const fn control(&self) -> &ControlParams {
        &self.control
    }
}

/// Resolve a definition against caller overrides.
///
/// Resolution never fails. Missing required values are authoring defects in
/// the definition or the caller, and surface in the target's behaviour.
#[must_use]
pub fn resolve(definition: &TaskDefinition, overrides: &ParameterOverrides) -> ResolvedInvocation {
    let merged = merge(definition.params(), overrides);

    let (control, environment): (BTreeMap<_, _>, BTreeMap<_, _>) = merged
        .into_iter()
        .partition(|(name, _)| name.starts_with(CONTROL_PREFIX));

    let mut arguments = definition.run().args().to_vec();
    arguments.extend(derived_arguments(&environment));

    ResolvedInvocation {
        environment,
        arguments,
        control: ControlParams { values: control },
    }
}

/// Merge overrides over defaults into a new map.
fn merge(
    defaults: &BTreeMap<String, String>,
    overrides: &ParameterOverrides,
) -> BTreeMap<String, String> {
    let mut merged = defaults.clone();
    merged.extend(overrides.values.clone());
    merged
}

fn render_entries(values: &BTreeMap<String, String>) -> Vec<String> {
    values
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}
