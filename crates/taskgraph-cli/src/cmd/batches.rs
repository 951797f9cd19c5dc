/// Implementation of `taskgraph batches <file>`.
use std::io::Write as _;

use taskgraph_core::DependencyGraph;

use super::stdout_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_batches};

/// Runs the `batches` command.
///
/// # Errors
///
/// [`CliError::CyclicGraph`] when the plan has a hard-edge cycle.
pub fn run(graph: &DependencyGraph, config: &FormatterConfig) -> Result<(), CliError> {
    let batches = graph.parallel_batches()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_batches(&mut out, &batches, config).map_err(stdout_error)?;
    out.flush().map_err(stdout_error)
}
