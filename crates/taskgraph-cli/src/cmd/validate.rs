/// Implementation of `taskgraph validate <file>`.
///
/// Runs the structural checks and writes one diagnostic per finding to
/// stderr, followed by a summary line.
///
/// Exit codes:
/// - 0: no error-severity findings (warnings and info are allowed)
/// - 1: at least one cycle, dangling edge, or rejected self-loop
use std::io::Write as _;
use std::time::Instant;

use taskgraph_core::{DependencyGraph, ValidationConfig};

use super::stderr_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_diagnostics, write_timing};

/// Runs the `validate` command.
///
/// # Errors
///
/// [`CliError::ValidationErrors`] when any error-severity finding exists.
pub fn run(
    graph: &DependencyGraph,
    checks: &ValidationConfig,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let started = Instant::now();
    let report = graph.validate_with(checks);
    let elapsed = started.elapsed();

    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    let errors =
        write_diagnostics(&mut err_out, &report.diagnostics(), config).map_err(stderr_error)?;
    write_timing(&mut err_out, "validated", elapsed, config).map_err(stderr_error)?;
    err_out.flush().map_err(stderr_error)?;

    if errors > 0 {
        Err(CliError::ValidationErrors)
    } else {
        Ok(())
    }
}
