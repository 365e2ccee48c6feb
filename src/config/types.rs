//! Configuration data types for boshtask.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::harness::DEFAULT_TIMEOUT_SECS;

/// Harness behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Upper bound on one invocation, in seconds.
    #[default(DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Directory holding the task definitions addressed by name.
    #[default(Utf8PathBuf::from("tasks"))]
    pub tasks_dir: Utf8PathBuf,
}

/// Container lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Remove the container once it exits (`--rm`).
    #[default(true)]
    pub remove: bool,
}

/// Root application configuration.
///
/// Loaded with layered precedence (lowest to highest): defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `BOSHTASK_CONFIG_PATH` environment variable
/// 2. `.boshtask.toml` in the current working directory
/// 3. `.boshtask.toml` in the home directory
/// 4. `~/.config/boshtask/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "BOSHTASK",
    post_merge_hook,
    discovery(
        app_name = "boshtask",
        env_var = "BOSHTASK_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".boshtask.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The container runtime program (e.g. `docker`, `podman`).
    pub runtime: Option<String>,

    /// The container image providing the task scripts.
    pub image: Option<String>,

    /// Harness configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub harness: HarnessConfig,

    /// Container lifecycle configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub container: ContainerConfig,
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Blank strings from files or the environment mean "unset".
        self.runtime = self.runtime.take().filter(|value| !value.trim().is_empty());
        self.image = self.image.take().filter(|value| !value.trim().is_empty());
        Ok(())
    }
}
