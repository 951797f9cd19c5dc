/// Input loading for the `taskgraph` binary.
///
/// `taskgraph-core` never touches the filesystem. Every command reads its
/// plan through [`load_graph`], which enforces `--max-file-size`, checks
/// UTF-8, parses the plan and builds the graph. Failures map to
/// [`CliError`] variants with exit code 2.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use taskgraph_core::{DependencyGraph, TaskPlan};

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads, parses and builds the task plan named by `source`.
///
/// # Errors
///
/// Any [`read_plan_text`] error, or [`CliError::InvalidPlan`] when the text
/// is not a valid plan.
pub fn load_graph(source: &PathOrStdin, max_size: u64) -> Result<DependencyGraph, CliError> {
    let text = read_plan_text(source, max_size)?;
    let plan = TaskPlan::from_json(&text)?;
    let graph = DependencyGraph::from_plan(&plan)?;
    tracing::debug!(
        source = %source,
        bytes = text.len(),
        tasks = graph.node_count(),
        edges = graph.edge_count(),
        "plan loaded"
    );
    Ok(graph)
}

/// Reads the whole of `source` as UTF-8 text, refusing more than `max_size`
/// bytes.
///
/// Files are checked against the limit via their metadata before any byte
/// is read. Stdin has no size up front, so it is read through a cap of
/// `max_size + 1` bytes and rejected if the extra byte arrives.
///
/// # Errors
///
/// [`CliError`] with exit code 2 for a missing or unreadable file, an
/// oversized input, a stdin read failure, or invalid UTF-8.
pub fn read_plan_text(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    let bytes = match source {
        PathOrStdin::Path(path) => {
            let file = open_checked(path, max_size)?;
            read_capped(file, max_size).map_err(|e| classify(&e, path))?
        }
        PathOrStdin::Stdin => read_capped(std::io::stdin().lock(), max_size)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?,
    };

    let len = bytes.len() as u64;
    if len > max_size {
        return Err(CliError::FileTooLarge {
            source: source.to_string(),
            limit: max_size,
            actual: None,
        });
    }

    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source.to_string(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

/// Opens `path` after checking its size against `max_size`.
fn open_checked(path: &Path, max_size: u64) -> Result<File, CliError> {
    let size = std::fs::metadata(path)
        .map_err(|e| classify(&e, path))?
        .len();
    if size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(size),
        });
    }
    File::open(path).map_err(|e| classify(&e, path))
}

/// Reads at most `max_size + 1` bytes, enough to tell "at the limit" from
/// "over it".
fn read_capped<R: Read>(reader: R, max_size: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)?;
    Ok(buf)
}

fn classify(e: &std::io::Error, path: &Path) -> CliError {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        // ErrorKind is non-exhaustive.
        ErrorKind::IsADirectory | ErrorKind::InvalidData | ErrorKind::Other | _ => {
            CliError::IoError {
                source: path.display().to_string(),
                detail: e.to_string(),
            }
        }
    }
}
