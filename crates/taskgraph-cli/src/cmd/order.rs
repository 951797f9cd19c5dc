/// Implementation of `taskgraph order <file>`.
///
/// Prints a topological order to stdout. A cyclic plan fails with exit code
/// 1 unless `--best-effort` is given, in which case the resolvable prefix is
/// printed first and the tasks stuck on cycles are listed afterwards.
use std::io::Write as _;

use serde_json::json;
use taskgraph_core::{DependencyGraph, TaskId};

use super::{stderr_error, stdout_error};
use crate::OutputFormat;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_id_list};

/// Runs the `order` command.
///
/// # Errors
///
/// [`CliError::CyclicGraph`] on a cyclic plan without `--best-effort`.
pub fn run(
    graph: &DependencyGraph,
    best_effort: bool,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if !best_effort {
        let order = graph.topological_sort()?;
        write_id_list(&mut out, "order", &order, config).map_err(stdout_error)?;
        return out.flush().map_err(stdout_error);
    }

    let result = graph.best_effort_order();
    match config.mode {
        OutputFormat::Human => {
            write_id_list(&mut out, "order", &result.order, config).map_err(stdout_error)?;
            if !result.is_complete() && !config.quiet {
                let stuck: Vec<&str> = result.unresolved.iter().map(TaskId::as_str).collect();
                writeln!(
                    std::io::stderr().lock(),
                    "warning: {} task(s) ordered arbitrarily because of cycles: {}",
                    stuck.len(),
                    stuck.join(", ")
                )
                .map_err(stderr_error)?;
            }
        }
        OutputFormat::Json => {
            writeln!(
                out,
                "{}",
                json!({ "order": result.order, "unresolved": result.unresolved })
            )
            .map_err(stdout_error)?;
        }
    }
    out.flush().map_err(stdout_error)
}
