/// Implementation of `taskgraph critical-path <file>`.
use std::io::Write as _;

use taskgraph_core::DependencyGraph;

use super::stdout_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_critical_path};

/// Runs the `critical-path` command.
///
/// # Errors
///
/// [`CliError::CyclicGraph`] when the plan has a hard-edge cycle.
pub fn run(graph: &DependencyGraph, config: &FormatterConfig) -> Result<(), CliError> {
    let path = graph.critical_path()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_critical_path(&mut out, &path, config).map_err(stdout_error)?;
    out.flush().map_err(stdout_error)
}
