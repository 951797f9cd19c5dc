/// Implementation of `taskgraph analyze <file>`.
///
/// Validates the plan and prints every derived view in one pass. In JSON
/// mode the whole [`taskgraph_core::PlanAnalysis`] is written to stdout as a
/// single pretty-printed document. In human mode diagnostics go to stderr
/// and the views go to stdout under section headings.
///
/// Exit code is 1 when the analysis found error-severity problems, even
/// though the available views were still printed.
use std::io::Write as _;
use std::time::Instant;

use taskgraph_core::{DependencyGraph, analyze};

use super::{stderr_error, stdout_error};
use crate::OutputFormat;
use crate::error::CliError;
use crate::format::{
    FormatterConfig, write_batches, write_critical_path, write_diagnostics, write_heading,
    write_id_list, write_timing,
};

/// Runs the `analyze` command.
///
/// # Errors
///
/// [`CliError::ValidationErrors`] when the report is blocking.
pub fn run(graph: &DependencyGraph, config: &FormatterConfig) -> Result<(), CliError> {
    let started = Instant::now();
    let analysis = analyze(graph);
    let elapsed = started.elapsed();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match config.mode {
        OutputFormat::Json => {
            let doc = serde_json::to_string_pretty(&analysis)
                .map_err(|e| stdout_error(std::io::Error::other(e)))?;
            writeln!(out, "{doc}").map_err(stdout_error)?;
        }
        OutputFormat::Human => {
            let stderr = std::io::stderr();
            let mut err_out = stderr.lock();
            write_diagnostics(&mut err_out, &analysis.diagnostics, config)
                .map_err(stderr_error)?;

            if let Some(order) = &analysis.order {
                write_heading(&mut out, "order:", config).map_err(stdout_error)?;
                write_id_list(&mut out, "order", order, config).map_err(stdout_error)?;
            }
            if let Some(path) = &analysis.critical_path {
                write_heading(&mut out, "critical path:", config).map_err(stdout_error)?;
                write_critical_path(&mut out, path, config).map_err(stdout_error)?;
            }
            if let Some(batches) = &analysis.batches {
                write_heading(&mut out, "batches:", config).map_err(stdout_error)?;
                write_batches(&mut out, batches, config).map_err(stdout_error)?;
            }
            write_timing(&mut err_out, "analyzed", elapsed, config).map_err(stderr_error)?;
        }
    }
    out.flush().map_err(stdout_error)?;

    if analysis.report.is_blocking() {
        Err(CliError::ValidationErrors)
    } else {
        Ok(())
    }
}
