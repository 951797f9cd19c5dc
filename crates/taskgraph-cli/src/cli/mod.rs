//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for PathOrStdin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("-"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits colored lines to stderr and plain text to stdout. `Json`
/// emits NDJSON diagnostics and a single JSON document per view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// All top-level subcommands exposed by the `taskgraph` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Check a task plan for cycles, dangling edges, and isolated tasks.
    Validate {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Skip the soft-edge ordering check.
        #[arg(long)]
        no_soft_check: bool,
        /// Fraction of isolated tasks above which the plan is flagged.
        #[arg(long, value_name = "RATIO", default_value = "0.5", value_parser = parse_ratio)]
        isolation_ratio: f64,
    },

    /// Print a topological execution order.
    Order {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// On a cyclic plan, print the resolvable prefix followed by the
        /// tasks stuck on cycles instead of failing.
        #[arg(long)]
        best_effort: bool,
    },

    /// Print the longest weighted dependency chain.
    CriticalPath {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print groups of tasks that can run concurrently.
    Batches {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Validate and print every derived view in one pass.
    Analyze {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print the tasks whose hard dependencies are all completed.
    Ready {
        /// Path to a task plan JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Id of a completed task (repeatable).
        #[arg(long = "done", value_name = "ID")]
        done: Vec<String>,
    },
}

/// Root CLI struct for the `taskgraph` binary.
///
/// All global flags are marked `global = true` so that clap propagates them
/// to every subcommand.
#[derive(Parser)]
#[command(
    name = "taskgraph",
    version,
    about = "Task dependency graph CLI",
    long_about = "Builds a dependency graph from a task plan and reports its\n\
                  execution order, critical path, parallel batches, and\n\
                  structural problems."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: timing and debug logs
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `TASKGRAPH_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "TASKGRAPH_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Parses a fraction in `0.0..=1.0` for `--isolation-ratio`.
fn parse_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{s} is not between 0 and 1"))
    }
}
