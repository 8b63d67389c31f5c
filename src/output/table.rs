//! Tabular renderers (table, CSV)

use std::collections::BTreeSet;

use crate::record::{Collection, Record};

/// Sorted union of field names across all records
fn columns(records: &Collection) -> Vec<&str> {
    let fields: BTreeSet<&str> = records
        .values()
        .filter_map(|entry| entry.as_record())
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    fields.into_iter().collect()
}

fn cell(record: &Record, field: &str) -> String {
    record.get(field).map(ToString::to_string).unwrap_or_default()
}

/// Aligned table with a `key` column followed by the sorted fields
///
/// ```text
/// key   | age | name
/// -------------------
/// alice | 30  | Alice
///
/// 1 record(s)
/// ```
pub fn render_table(records: &Collection) -> String {
    if records.is_empty() {
        return "No records found".to_string();
    }

    let fields = columns(records);
    let rows: Vec<(&str, &Record)> = records
        .iter()
        .filter_map(|(key, entry)| entry.as_record().map(|r| (key.as_str(), r)))
        .collect();

    let mut widths: Vec<usize> = std::iter::once("key")
        .chain(fields.iter().copied())
        .map(|name| name.chars().count())
        .collect();

    for (key, record) in &rows {
        widths[0] = widths[0].max(key.chars().count());
        for (i, field) in fields.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(cell(record, field).chars().count());
        }
    }

    let join = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header = join(
        std::iter::once("key".to_string())
            .chain(fields.iter().map(|f| f.to_string()))
            .collect(),
    );
    let separator = "-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len() - 1));

    let mut lines = vec![header, separator];
    for (key, record) in &rows {
        lines.push(join(
            std::iter::once(key.to_string())
                .chain(fields.iter().map(|f| cell(record, f)))
                .collect(),
        ));
    }

    format!("{}\n\n{} record(s)", lines.join("\n"), records.len())
}

/// CSV with a `key` column followed by the sorted fields
pub fn render_csv(records: &Collection) -> String {
    if records.is_empty() {
        return String::new();
    }

    let fields = columns(records);

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        std::iter::once("key")
            .chain(fields.iter().copied())
            .map(csv_escape)
            .collect::<Vec<_>>()
            .join(","),
    );

    for (key, entry) in records {
        let Some(record) = entry.as_record() else {
            continue;
        };
        let mut row = vec![csv_escape(key)];
        row.extend(fields.iter().map(|f| csv_escape(&cell(record, f))));
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Quote a value containing a comma, quote or newline
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
