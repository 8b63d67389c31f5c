//! Import Module
//!
//! Turns line-oriented text into records for the store.
//!
//! ## Line Format
//! ```text
//! alice name:Alice age:30 email:alice@example.com
//! ^^^^^ ^^^^^^^^^^ ^^^^^^
//! key   field:value pairs, whitespace separated
//!
//! # comments and blank lines are skipped
//! {"_key": "bob", "name": "Bob"}      JSON Lines are accepted too
//! ```
//!
//! Values are coerced integer → float → string. Everything after the first
//! colon is the value, so `time:10:30:00` keeps `"10:30:00"`.
//!
//! Parsing is best-effort: a bad line becomes a [`LineError`] and the rest
//! of the input is still processed.

mod json;
mod parser;

pub use json::{parse_json_document, parse_json_line};
pub use parser::{parse_field, parse_fields, parse_line};

use std::fmt;
use std::io::{BufRead, Read};

use thiserror::Error;
use tracing::debug;

use crate::error::Result;
use crate::record::Record;

/// Why a single input line was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportErrorKind {
    #[error("missing field:value pairs")]
    MissingFields,

    #[error("invalid format '{0}', use field:value")]
    MissingColon(String),

    #[error("missing field name in '{0}'")]
    MissingFieldName(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("JSON line missing '_key' field")]
    MissingJsonKey,

    #[error("'{0}' is not a flat record")]
    NotARecord(String),

    #[error("field '{0}' must be a string, number or boolean")]
    NonScalarField(String),
}

/// A rejected input line
#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    /// 1-based line number; 0 for whole-document errors
    pub line: usize,

    /// The offending line, trimmed
    pub raw: String,

    pub kind: ImportErrorKind,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} ({})", self.line, self.kind, self.raw)
    }
}

/// Records ready for the store plus the lines that were rejected
pub type ParseOutput = (Vec<(String, Record)>, Vec<LineError>);

/// How an import stream is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportFormat {
    /// One record per line: `key field:value ...` or a JSON object
    #[default]
    Lines,

    /// The whole input is one JSON object mapping keys to records
    JsonDocument,
}

/// Outcome of an import into the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Records handed to the store
    pub imported: usize,

    /// Lines that were skipped
    pub errors: Vec<LineError>,
}

/// Parse a sequence of input lines
pub fn parse_lines<I, S>(lines: I) -> ParseOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let trimmed = line.as_ref().trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parsed = if trimmed.starts_with('{') && trimmed.ends_with('}') {
            parse_json_line(trimmed)
        } else {
            parse_line(trimmed)
        };

        match parsed {
            Ok(record) => records.push(record),
            Err(kind) => {
                debug!(line = line_number, reason = %kind, "skipping import line");
                errors.push(LineError {
                    line: line_number,
                    raw: trimmed.to_string(),
                    kind,
                });
            }
        }
    }

    (records, errors)
}

/// Read and parse an entire stream
///
/// Only a failure to read the stream is an error; malformed content is
/// reported through the returned error list.
pub fn read_input<R: BufRead>(reader: R, format: ImportFormat) -> Result<ParseOutput> {
    match format {
        ImportFormat::Lines => {
            let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
            Ok(parse_lines(lines))
        }
        ImportFormat::JsonDocument => {
            let mut reader = reader;
            let mut contents = String::new();
            reader.read_to_string(&mut contents)?;
            Ok(parse_json_document(&contents))
        }
    }
}
