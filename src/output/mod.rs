//! Output Module
//!
//! Renders records for the terminal.
//!
//! ### Formats
//! - `table`:   aligned columns, sorted fields, record count footer (default)
//! - `csv`:     header row + one row per record
//! - `json`:    the collection as a pretty JSON object
//! - `jsonl`:   one compact object per record, key in `_key` (lossless export)
//! - `oneline`: `key field:value ...`, the import syntax (display only)
//!
//! Rows are always sorted by key and columns by field name. Entries that
//! are not records only appear in `json` output.

mod lines;
mod table;

pub use lines::{render_jsonl, render_oneline};
pub use table::{render_csv, render_table};

use crate::error::{NoboxError, Result};
use crate::record::Collection;

/// Output format for `get` and `all`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    JsonLines,
    OneLine,
}

/// Render a set of entries in the given format
pub fn render(records: &Collection, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Csv => Ok(render_csv(records)),
        OutputFormat::Json => render_json(records),
        OutputFormat::JsonLines => render_jsonl(records),
        OutputFormat::OneLine => Ok(render_oneline(records)),
    }
}

/// Pretty JSON object of all entries
pub fn render_json(records: &Collection) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| NoboxError::Serialization(e.to_string()))
}
