/// Output formatting: human-readable and JSON modes.
///
/// Diagnostics and the summary line go to stderr; derived views (order,
/// batches, critical path, ready set) go to stdout so they can be piped.
///
/// - **Human mode** (default): one line per diagnostic, color-coded by
///   severity. Colors are disabled when `--no-color` is set, the `NO_COLOR`
///   environment variable is present (per <https://no-color.org>), or stderr
///   is not a TTY.
/// - **JSON mode**: diagnostics as NDJSON on stderr, views as a single JSON
///   document on stdout.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use serde_json::json;
use taskgraph_core::{CriticalPath, Diagnostic, Severity, TaskId};

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Formatter settings derived from the global CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct FormatterConfig {
    /// Output mode selected by `--format`.
    pub mode: OutputFormat,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(mode: OutputFormat, no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            mode,
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn suppresses(&self, severity: Severity) -> bool {
        self.quiet && !matches!(severity, Severity::Error)
    }
}

// ---------------------------------------------------------------------------
// Diagnostics (stderr)
// ---------------------------------------------------------------------------

/// Writes a single [`Diagnostic`] in the configured mode.
///
/// Human format: `[E] cycle  cycle A -> B -> A: hard dependencies form a cycle; no execution order exists`
///
/// In quiet mode, warnings and info findings are suppressed.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.suppresses(diag.severity) {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Human => write_diagnostic_human(writer, diag, config.colors),
        OutputFormat::Json => {
            let line = serde_json::to_string(diag).map_err(std::io::Error::other)?;
            writeln!(writer, "{line}")
        }
    }
}

fn write_diagnostic_human<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    colors: bool,
) -> std::io::Result<()> {
    let (tag, color) = match diag.severity {
        Severity::Error => ("[E]", ANSI_RED),
        Severity::Warning => ("[W]", ANSI_YELLOW),
        Severity::Info => ("[I]", ANSI_CYAN),
    };
    if colors {
        writeln!(
            writer,
            "{color}{tag}{ANSI_RESET} {}  {}: {}",
            diag.check, diag.location, diag.message
        )
    } else {
        writeln!(
            writer,
            "{tag} {}  {}: {}",
            diag.check, diag.location, diag.message
        )
    }
}

/// Writes every diagnostic followed by the severity summary.
///
/// Returns the number of error-severity findings.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostics<W: Write>(
    writer: &mut W,
    diagnostics: &[Diagnostic],
    config: &FormatterConfig,
) -> std::io::Result<usize> {
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut infos = 0usize;
    for diag in diagnostics {
        match diag.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Info => infos += 1,
        }
        write_diagnostic(writer, diag, config)?;
    }
    write_summary(writer, errors, warnings, infos, config)?;
    Ok(errors)
}

/// Writes the summary line: `3 errors, 1 warning, 0 info`, or
/// `{"summary":{...}}` in JSON mode. Suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    errors: usize,
    warnings: usize,
    infos: usize,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Human => writeln!(
            writer,
            "{errors} {}, {warnings} {}, {infos} info",
            pluralize(errors, "error", "errors"),
            pluralize(warnings, "warning", "warnings"),
        ),
        OutputFormat::Json => writeln!(
            writer,
            "{}",
            json!({ "summary": { "errors": errors, "warnings": warnings, "info": infos } })
        ),
    }
}

/// Writes `label in Nms` in verbose human mode; a no-op otherwise.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose || config.quiet {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

// ---------------------------------------------------------------------------
// Derived views (stdout)
// ---------------------------------------------------------------------------

/// Writes a flat list of task ids: one per line, or `{"<key>":[...]}`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_id_list<W: Write>(
    writer: &mut W,
    key: &str,
    ids: &[TaskId],
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.mode {
        OutputFormat::Human => {
            for id in ids {
                writeln!(writer, "{id}")?;
            }
            Ok(())
        }
        OutputFormat::Json => writeln!(writer, "{}", json!({ key: ids })),
    }
}

/// Writes parallel batches: `batch 1: A, B` per line, or `{"batches":[[...]]}`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_batches<W: Write>(
    writer: &mut W,
    batches: &[Vec<TaskId>],
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.mode {
        OutputFormat::Human => {
            for (k, batch) in batches.iter().enumerate() {
                writeln!(writer, "batch {}: {}", k + 1, join_ids(batch, ", "))?;
            }
            Ok(())
        }
        OutputFormat::Json => writeln!(writer, "{}", json!({ "batches": batches })),
    }
}

/// Writes the critical path and its length.
///
/// Human format is the chain `A -> B -> C` followed by `length: 7`; an empty
/// graph prints `(empty)` and length 0.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_critical_path<W: Write>(
    writer: &mut W,
    path: &CriticalPath,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.mode {
        OutputFormat::Human => {
            if path.is_empty() {
                writeln!(writer, "(empty)")?;
            } else {
                writeln!(writer, "{}", join_ids(&path.tasks, " -> "))?;
            }
            writeln!(writer, "length: {}", path.length)
        }
        OutputFormat::Json => {
            let line = serde_json::to_string(path).map_err(std::io::Error::other)?;
            writeln!(writer, "{line}")
        }
    }
}

/// Writes a section heading in human mode (bold when colors are enabled).
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_heading<W: Write>(
    writer: &mut W,
    title: &str,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.colors {
        writeln!(writer, "{ANSI_BOLD}{title}{ANSI_RESET}")
    } else {
        writeln!(writer, "{title}")
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

fn join_ids(ids: &[TaskId], sep: &str) -> String {
    ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(sep)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
