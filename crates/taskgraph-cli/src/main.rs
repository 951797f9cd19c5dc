use std::process::ExitCode;

use clap::Parser as _;
use taskgraph_core::ValidationConfig;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod format;
mod io;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use error::CliError;
use format::FormatterConfig;

/// Installs the stderr log subscriber.
///
/// `TASKGRAPH_LOG` takes precedence; otherwise the level follows
/// `--quiet`/`--verbose`.
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("TASKGRAPH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet, cli.verbose);
    match &cli.command {
        Command::Validate {
            file,
            no_soft_check,
            isolation_ratio,
        } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            let checks = ValidationConfig {
                isolation_ratio: *isolation_ratio,
                check_soft_edges: !no_soft_check,
            };
            cmd::validate::run(&graph, &checks, &config)
        }
        Command::Order { file, best_effort } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            cmd::order::run(&graph, *best_effort, &config)
        }
        Command::CriticalPath { file } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            cmd::critical_path::run(&graph, &config)
        }
        Command::Batches { file } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            cmd::batches::run(&graph, &config)
        }
        Command::Analyze { file } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            cmd::analyze::run(&graph, &config)
        }
        Command::Ready { file, done } => {
            let graph = io::load_graph(file, cli.max_file_size)?;
            cmd::ready::run(&graph, done, &config)
        }
    }
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Validation findings were already written as diagnostics.
            if !matches!(e, CliError::ValidationErrors) {
                eprintln!("{}", e.message());
            }
            ExitCode::from(e.exit_code())
        }
    }
}
