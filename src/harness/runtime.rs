//! Container runtime program resolution.

/// Environment variables checked after configuration sources.
const FALLBACK_ENV_VARS: &[&str] = &["CONTAINER_RUNTIME"];

/// Runtime program used when nothing else is configured.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Resolves the container runtime program from environment variables.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
pub struct RuntimeResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> RuntimeResolver<'a, E> {
    /// Creates a new resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the runtime program from fallback environment variables.
    ///
    /// Returns `None` if no fallback variable is set or all are empty.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.trim().is_empty())
    }

    /// Resolves the runtime program.
    ///
    /// Resolution order:
    /// 1. `configured` (from CLI, config file, or `BOSHTASK_RUNTIME`)
    /// 2. `CONTAINER_RUNTIME`
    /// 3. [`DEFAULT_RUNTIME`]
    #[must_use]
    pub fn resolve(&self, configured: Option<&str>) -> String {
        configured
            .filter(|value| !value.trim().is_empty())
            .map(String::from)
            .or_else(|| self.resolve_from_env())
            .unwrap_or_else(|| String::from(DEFAULT_RUNTIME))
    }
}
