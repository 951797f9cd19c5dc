/// Errors the `taskgraph` binary reports, and the exit code for each.
///
/// Two exit codes are used besides 0:
///
/// - **2** ([`EXIT_INPUT`]): the plan could not be read or parsed, so no
///   graph exists.
/// - **1** ([`EXIT_FINDINGS`]): the graph was built but has blocking
///   findings, or a cycle makes the requested view undefined.
use std::fmt;
use std::path::PathBuf;

use taskgraph_core::{GraphError, PlanError, TaskId};

/// Exit code for blocking findings and cyclic graphs.
pub const EXIT_FINDINGS: u8 = 1;
/// Exit code for unreadable or malformed input.
pub const EXIT_INPUT: u8 = 2;

#[derive(Debug)]
pub enum CliError {
    /// The plan file does not exist.
    FileNotFound { path: PathBuf },

    /// The plan file exists but cannot be read by this process.
    PermissionDenied { path: PathBuf },

    /// The input is larger than `--max-file-size`.
    ///
    /// `actual` is known for files only; stdin is cut off at the limit.
    FileTooLarge {
        source: String,
        limit: u64,
        actual: Option<u64>,
    },

    /// The input is not UTF-8; `byte_offset` is where decoding stopped.
    InvalidUtf8 { source: String, byte_offset: usize },

    /// Reading stdin failed.
    StdinReadError { detail: String },

    /// Any other I/O failure, on input or on an output stream.
    IoError { source: String, detail: String },

    /// The text is not a valid task plan: bad JSON, a bad id, or a bad
    /// weight.
    InvalidPlan { detail: String },

    /// Validation produced error-severity findings. They were already
    /// printed as diagnostics, so `main` adds nothing.
    ValidationErrors,

    /// A hard-edge cycle blocks the requested view.
    CyclicGraph { cycle: Vec<TaskId> },
}

impl CliError {
    /// Wraps a failed write to `stream` (`"stdout"` or `"stderr"`).
    pub fn output(stream: &str, err: &std::io::Error) -> Self {
        Self::IoError {
            source: stream.to_owned(),
            detail: err.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ValidationErrors | Self::CyclicGraph { .. } => EXIT_FINDINGS,
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidPlan { .. } => EXIT_INPUT,
        }
    }

    /// The line `main` prints to stderr, `error: ` prefix included.
    pub fn message(&self) -> String {
        format!("error: {self}")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::PermissionDenied { path } => {
                write!(f, "permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => write!(
                f,
                "file too large: {source} is {actual} bytes, limit is {limit} bytes"
            ),
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => write!(f, "file too large: {source} exceeds {limit} bytes"),
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => write!(f, "invalid UTF-8 in {source} at byte {byte_offset}"),
            Self::StdinReadError { detail } => write!(f, "cannot read stdin: {detail}"),
            Self::IoError { source, detail } => write!(f, "I/O error on {source}: {detail}"),
            Self::InvalidPlan { detail } => f.write_str(detail),
            Self::ValidationErrors => f.write_str("task plan has blocking findings"),
            Self::CyclicGraph { cycle } => {
                let path: Vec<&str> = cycle.iter().map(TaskId::as_str).collect();
                write!(f, "dependency cycle detected: {}", path.join(" -> "))
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<PlanError> for CliError {
    fn from(err: PlanError) -> Self {
        Self::InvalidPlan {
            detail: err.to_string(),
        }
    }
}

impl From<GraphError> for CliError {
    fn from(err: GraphError) -> Self {
        // GraphError is non-exhaustive; anything new counts as bad input.
        match err {
            GraphError::CyclicGraph { cycle } => Self::CyclicGraph { cycle },
            other @ (GraphError::InvalidEdge { .. } | GraphError::InvalidWeight { .. } | _) => {
                Self::InvalidPlan {
                    detail: other.to_string(),
                }
            }
        }
    }
}
