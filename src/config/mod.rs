//! Configuration system for boshtask.
//!
//! This module provides the configuration structures and CLI definitions.
//! Layer merging is handled by the `ortho_config` crate with the precedence
//! CLI flags > environment variables > configuration file > defaults.
//!
//! The configuration file is expected at `~/.config/boshtask/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! runtime = "/usr/local/bin/docker"
//! image = "dpb587/bosh-concourse-tasks:master-spec"
//!
//! [harness]
//! timeout_secs = 15
//! tasks_dir = "tasks"
//!
//! [container]
//! remove = true
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands, TaskArgs};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, ContainerConfig, HarnessConfig};
