//! Diagnostic echo line parsing.

use std::collections::BTreeMap;

const ENV_PREFIX: &str = "env: ";
const ARG_PREFIX: &str = "arg: ";

/// What the target reported receiving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Reported environment; a later line for the same name wins.
    pub env: BTreeMap<String, String>,
    /// Reported arguments in received order.
    pub args: Vec<String>,
}

/// Parse `env: NAME=VALUE` and `arg: VALUE` lines out of captured output.
///
/// Every other line is ignored, as are `env:` lines without `=` and lines
/// with nothing after the prefix.
#[must_use]
pub fn parse_diagnostics(output: &str) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    for line in output.trim().lines() {
        if let Some(assignment) = line.strip_prefix(ENV_PREFIX).filter(|rest| !rest.is_empty()) {
            match assignment.split_once('=') {
                Some((name, value)) => {
                    report.env.insert(String::from(name), String::from(value));
                }
                None => tracing::debug!(line, "ignoring env line without '='"),
            }
        } else if let Some(value) = line.strip_prefix(ARG_PREFIX).filter(|rest| !rest.is_empty())
        {
            report.args.push(String::from(value));
        }
    }

    report
}
