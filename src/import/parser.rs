//! Line Parser
//!
//! `key field:value ...` lines and the `field:value` tokens shared with the
//! CLI's `set` command.

use crate::record::{FieldValue, Record};

use super::ImportErrorKind;

/// Parse one trimmed, non-comment line into `(key, fields)`
pub fn parse_line(line: &str) -> Result<(String, Record), ImportErrorKind> {
    let mut tokens = line.split_whitespace();

    let key = tokens.next().ok_or(ImportErrorKind::MissingFields)?;
    let fields = parse_fields(tokens)?;

    if fields.is_empty() {
        return Err(ImportErrorKind::MissingFields);
    }

    Ok((key.to_string(), fields))
}

/// Parse `field:value` tokens into a record; the first bad token wins
pub fn parse_fields<I, S>(tokens: I) -> Result<Record, ImportErrorKind>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut record = Record::new();
    for token in tokens {
        let (field, value) = parse_field(token.as_ref())?;
        record.insert(field, value);
    }
    Ok(record)
}

/// Split a token at its first colon and coerce the value
pub fn parse_field(token: &str) -> Result<(String, FieldValue), ImportErrorKind> {
    let (field, value) = token
        .split_once(':')
        .ok_or_else(|| ImportErrorKind::MissingColon(token.to_string()))?;

    if field.is_empty() {
        return Err(ImportErrorKind::MissingFieldName(token.to_string()));
    }

    Ok((field.to_string(), FieldValue::coerce(value)))
}
