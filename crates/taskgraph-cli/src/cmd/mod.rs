/// Command module for the `taskgraph` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes an already-built [`taskgraph_core::DependencyGraph`] plus the
/// parsed arguments and returns `Ok(())` on success or a
/// [`crate::error::CliError`] on failure.
pub mod analyze;
pub mod batches;
pub mod critical_path;
pub mod order;
pub mod ready;
pub mod validate;

use crate::error::CliError;

pub(crate) fn stdout_error(err: std::io::Error) -> CliError {
    CliError::output("stdout", &err)
}

pub(crate) fn stderr_error(err: std::io::Error) -> CliError {
    CliError::output("stderr", &err)
}
