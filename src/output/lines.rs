//! Line-per-record renderers (JSON Lines, one-line)

use serde::Serialize;

use crate::error::{NoboxError, Result};
use crate::record::{Collection, Record};

/// A record with its key in front, as written to JSON Lines
#[derive(Serialize)]
struct KeyedRecord<'a> {
    #[serde(rename = "_key")]
    key: &'a str,

    #[serde(flatten)]
    fields: &'a Record,
}

/// One compact JSON object per record: `{"_key":"alice","age":30}`
pub fn render_jsonl(records: &Collection) -> Result<String> {
    let mut lines = Vec::with_capacity(records.len());

    for (key, entry) in records {
        let Some(fields) = entry.as_record() else {
            continue;
        };
        let line = serde_json::to_string(&KeyedRecord { key, fields })
            .map_err(|e| NoboxError::Serialization(e.to_string()))?;
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// `key field:value ...` per record, in the import syntax
///
/// Not lossless: strings with whitespace, numeric-looking strings and
/// booleans do not come back unchanged. Use JSON Lines to export.
pub fn render_oneline(records: &Collection) -> String {
    records
        .iter()
        .filter_map(|(key, entry)| {
            let fields = entry.as_record()?;
            let pairs: Vec<String> = fields
                .iter()
                .map(|(field, value)| format!("{}:{}", field, value))
                .collect();
            Some(
                std::iter::once(key.to_string())
                    .chain(pairs)
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
