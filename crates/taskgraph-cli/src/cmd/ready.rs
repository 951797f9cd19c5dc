/// Implementation of `taskgraph ready <file> --done ID...`.
///
/// Never fails on a cyclic plan: tasks on a cycle simply never become ready.
use std::io::Write as _;

use taskgraph_core::DependencyGraph;

use super::stdout_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_id_list};

/// Runs the `ready` command.
///
/// # Errors
///
/// Only when stdout cannot be written.
pub fn run(
    graph: &DependencyGraph,
    done: &[String],
    config: &FormatterConfig,
) -> Result<(), CliError> {
    for id in done {
        if !graph.contains_node(id) {
            tracing::warn!(id = %id, "completed id is not a task in this plan");
        }
    }
    let ready = graph.ready_tasks(done);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_id_list(&mut out, "ready", &ready, config).map_err(stdout_error)?;
    out.flush().map_err(stdout_error)
}
