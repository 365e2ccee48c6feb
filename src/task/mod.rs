//! Declarative task definitions.
//!
//! A task definition pairs a target executable with fixed leading arguments
//! and a table of default parameters. Definitions use the Concourse task
//! document layout; only the `run` and `params` sections are interpreted.
//!
//! # Example Definition
//!
//! ```yaml
//! platform: linux
//! run:
//!   path: /opt/bosh-concourse-tasks/bin/bosh-task
//!   args: [start]
//! params:
//!   environment: ~
//!   deployment: ~
//!   instance_group: ~
//! ```

mod catalog;
mod params;


use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;

use crate::error::{BoshTaskError, ConfigError, Result, TaskError};

pub use catalog::{TaskCatalog, locate_task};

/// The target executable and its fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunSpec {
    path: String,
    #[serde(default)]
    args: Vec<String>,
}

impl RunSpec {
    /// Return the path of the executable run inside the container.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Return the fixed arguments passed before any derived arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// A loaded task definition.
///
/// Definitions are immutable once loaded; resolution produces a new
/// [`crate::resolve::ResolvedInvocation`] rather than mutating the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskDefinition {
    run: RunSpec,
    #[serde(default, deserialize_with = "params::deserialize_params")]
    params: BTreeMap<String, String>,
}

impl TaskDefinition {
    /// Build a definition directly from its parts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `run_path` is blank.
    pub fn new(
        run_path: impl Into<String>,
        run_args: Vec<String>,
        params: BTreeMap<String, String>,
    ) -> Result<Self> {
        let definition = Self {
            run: RunSpec {
                path: run_path.into(),
                args: run_args,
            },
            params,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Parse and validate a definition from YAML source text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed documents and
    /// `ConfigError::MissingRequired` when `run.path` is blank.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let definition: Self =
            serde_yaml::from_str(source).map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Return the run section.
    #[must_use]
    pub const fn run(&self) -> &RunSpec {
        &self.run
    }

    /// Return the declared default parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    fn validate(&self) -> Result<()> {
        if self.run.path.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("run.path"),
            }
            .into());
        }
        Ok(())
    }
}

/// Load a task definition from a file.
///
/// The parent directory is opened with ambient authority and the file is
/// read relative to it.
///
/// # Errors
///
/// Returns `TaskError::NotFound` when the file does not exist,
/// `TaskError::ReadFailed` when it cannot be read, and
/// `TaskError::ParseFailed` when the document is malformed or has no
/// `run.path`.
pub fn load_task(path: &Utf8Path) -> Result<TaskDefinition> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().unwrap_or(path.as_str());

    let content = Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(file_name))
        .map_err(|e| read_error(path, &e))?;

    tracing::debug!(task = %path, "loaded task definition");

    TaskDefinition::from_yaml(&content).map_err(|e| {
        let message = match e {
            BoshTaskError::Config(ConfigError::ParseError { message }) => message,
            other => other.to_string(),
        };
        TaskError::ParseFailed {
            path: path.to_owned(),
            message,
        }
        .into()
    })
}

fn read_error(path: &Utf8Path, error: &io::Error) -> TaskError {
    if error.kind() == io::ErrorKind::NotFound {
        TaskError::NotFound {
            path: Utf8PathBuf::from(path),
        }
    } else {
        TaskError::ReadFailed {
            path: Utf8PathBuf::from(path),
            message: error.to_string(),
        }
    }
}
