//! Arguments derived from well-known parameter names.
//!
//! Derived arguments follow the fixed run args in this order: the errand
//! name, the `-c` command, then the instance selector. Empty values count as
//! absent, since task definitions usually declare these parameters with
//! empty defaults.

use std::collections::BTreeMap;

/// Parameter naming the errand to run.
pub const ERRAND_PARAM: &str = "errand";

/// Parameter holding a command executed on the selected instances.
pub const COMMAND_PARAM: &str = "command";

/// Parameter naming an instance group.
pub const INSTANCE_GROUP_PARAM: &str = "instance_group";

/// Parameter naming an instance within its group.
pub const INSTANCE_ID_PARAM: &str = "instance_id";

/// Which part of a deployment an invocation addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSelector {
    /// The whole deployment; no positional argument.
    Deployment,
    /// Every instance of one group.
    Group(String),
    /// One instance, addressed as `group/id`.
    Instance {
        /// The owning instance group.
        group: String,
        /// The instance identifier within the group.
        id: String,
    },
}

impl InstanceSelector {
    /// Build a selector from optional group and id values.
    ///
    /// An id without its group is ignored: an instance cannot be addressed
    /// without the group that owns it.
    #[must_use]
    pub fn from_parts(group: Option<&str>, id: Option<&str>) -> Self {
        match (non_empty(group), non_empty(id)) {
            (Some(group_name), Some(instance_id)) => Self::Instance {
                group: String::from(group_name),
                id: String::from(instance_id),
            },
            (Some(group_name), None) => Self::Group(String::from(group_name)),
            (None, _) => Self::Deployment,
        }
    }

    /// Build a selector from a parameter set.
    #[must_use]
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        Self::from_parts(
            params.get(INSTANCE_GROUP_PARAM).map(String::as_str),
            params.get(INSTANCE_ID_PARAM).map(String::as_str),
        )
    }

    /// Return the positional argument for this selector, if any.
    #[must_use]
    pub fn to_argument(&self) -> Option<String> {
        match self {
            Self::Deployment => None,
            Self::Group(group) => Some(group.clone()),
            Self::Instance { group, id } => Some(format!("{group}/{id}")),
        }
    }
}

/// Compute the arguments appended after a definition's fixed run args.
#[must_use]
pub fn derived_arguments(params: &BTreeMap<String, String>) -> Vec<String> {
    let lookup = |name: &str| non_empty(params.get(name).map(String::as_str));
    let mut arguments = Vec::new();

    if let Some(errand) = lookup(ERRAND_PARAM) {
        arguments.push(String::from(errand));
    }
    if let Some(command) = lookup(COMMAND_PARAM) {
        arguments.push(String::from("-c"));
        arguments.push(String::from(command));
    }
    arguments.extend(InstanceSelector::from_params(params).to_argument());

    arguments
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
