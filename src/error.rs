//! Error taxonomy for sampling, parsing and the metric catalog.
//!
//! Per-report failures (`SampleError`, `MalformedOutputError`) are contained by
//! the collector and never reach the exposition layer. `CatalogError` signals an
//! inconsistent metric catalog and aborts startup.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use crate::catalog::ReportMode;

/// Failure to run the external diagnostic tool to completion.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("tool not found at {}", .tool.display())]
    ToolNotFound { tool: PathBuf },

    #[error("failed to launch {}: {source}", .tool.display())]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target process {target} not found")]
    TargetNotFound { target: String },

    #[error("tool exited with {status}: {stderr}")]
    NonZeroExit { status: ExitStatus, stderr: String },

    #[error("failed to collect tool output: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one sampler invocation.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("{mode} sampling failed: {source}")]
    Execution {
        mode: ReportMode,
        #[source]
        source: ExecutionError,
    },

    #[error("{mode} sampling timed out after {timeout:?}")]
    Timeout { mode: ReportMode, timeout: Duration },
}

/// Why a report's output could not be turned into values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    TooFewLines { lines: usize },
    ColumnOutOfRange { column: usize, fields: usize },
    NotANumber { column: usize, field: String },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::TooFewLines { lines } => {
                write!(f, "expected a header and a data line, got {lines} line(s)")
            }
            MalformedReason::ColumnOutOfRange { column, fields } => {
                write!(f, "column {column} out of range for {fields} field(s)")
            }
            MalformedReason::NotANumber { column, field } => {
                write!(f, "column {column} value {field:?} is not a number")
            }
        }
    }
}

/// Tool output that does not match the report's positional schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed {mode} output ({reason}): {line:?}")]
pub struct MalformedOutputError {
    pub mode: ReportMode,
    pub reason: MalformedReason,
    /// Offending data line, or the whole output when no data line exists.
    pub line: String,
}

/// Misuse of the metric catalog. Indicates a programming defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("metric {0:?} was never declared")]
    UnknownMetric(String),

    #[error("metric {0:?} declared twice with different definitions")]
    DuplicateMetric(String),
}

/// Everything that can go wrong while collecting a single report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Malformed(#[from] MalformedOutputError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ReportError {
    /// Short classification used for logs and internal stats.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Sample(SampleError::Execution { .. }) => "execution",
            ReportError::Sample(SampleError::Timeout { .. }) => "timeout",
            ReportError::Malformed(_) => "malformed_output",
            ReportError::Catalog(_) => "catalog",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_includes_mode_and_line() {
        let err = MalformedOutputError {
            mode: ReportMode::GcOld,
            reason: MalformedReason::NotANumber {
                column: 5,
                field: "-".into(),
            },
            line: "1.0 2.0 3.0 4.0 5.0 -".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gcold"), "got: {msg}");
        assert!(msg.contains("column 5"), "got: {msg}");
        assert!(msg.contains("1.0 2.0"), "got: {msg}");
    }

    #[test]
    fn test_report_error_kind() {
        let timeout: ReportError = SampleError::Timeout {
            mode: ReportMode::GcNew,
            timeout: Duration::from_millis(10),
        }
        .into();
        assert_eq!(timeout.kind(), "timeout");

        let catalog: ReportError = CatalogError::UnknownMetric("x".into()).into();
        assert_eq!(catalog.kind(), "catalog");
    }
}
