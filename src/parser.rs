//! Positional parser for jstat's tabular output.
//!
//! jstat prints one header line followed by one or more data lines, columns
//! separated by runs of whitespace. Only the first data line is used. A report
//! is extracted all-or-nothing: any short line or non-numeric field rejects the
//! whole line, since positional output that does not line up cannot be trusted.

use tracing::{debug, warn};

use crate::catalog::ReportSpec;
use crate::error::{MalformedOutputError, MalformedReason};

/// Index of the data line within the output (line 0 is the header).
const DATA_LINE: usize = 1;

/// A value extracted from one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub metric: &'static str,
    pub value: f64,
}

/// Extracts every column declared by `spec` from `raw`.
///
/// Values stay in the tool's native units (kB, counts, seconds).
pub fn parse(raw: &str, spec: &ReportSpec) -> Result<Vec<Field>, MalformedOutputError> {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() <= DATA_LINE {
        return Err(MalformedOutputError {
            mode: spec.mode,
            reason: MalformedReason::TooFewLines { lines: lines.len() },
            line: raw.to_string(),
        });
    }

    if lines.len() > DATA_LINE + 1 {
        debug!(
            mode = %spec.mode,
            extra = lines.len() - DATA_LINE - 1,
            "ignoring additional data lines"
        );
    }

    let header: Vec<&str> = lines[0].split_whitespace().collect();
    let line = lines[DATA_LINE];
    let fields: Vec<&str> = line.split_whitespace().collect();

    let malformed = |reason| MalformedOutputError {
        mode: spec.mode,
        reason,
        line: line.to_string(),
    };

    let mut out = Vec::with_capacity(spec.columns.len());
    for extraction in spec.columns {
        let field = fields.get(extraction.column).ok_or_else(|| {
            malformed(MalformedReason::ColumnOutOfRange {
                column: extraction.column,
                fields: fields.len(),
            })
        })?;

        let value = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                malformed(MalformedReason::NotANumber {
                    column: extraction.column,
                    field: (*field).to_string(),
                })
            })?;

        match header.get(extraction.column) {
            Some(label) if *label == extraction.header => {}
            label => warn!(
                mode = %spec.mode,
                column = extraction.column,
                expected = extraction.header,
                found = label.copied().unwrap_or("<missing>"),
                "unexpected column header, jstat layout may have changed"
            ),
        }

        out.push(Field {
            metric: extraction.metric,
            value,
        });
    }

    Ok(out)
}
