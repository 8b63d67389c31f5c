//! JSON Imports
//!
//! JSON Lines (`{"_key": ..., field: value}`) and whole JSON documents.

use serde_json::{Map, Value};

use crate::record::{FieldValue, Record};

use super::{ImportErrorKind, LineError, ParseOutput};

/// Member holding the record key in a JSON line
const KEY_FIELD: &str = "_key";

/// Parse one JSON Lines object into `(key, fields)`
pub fn parse_json_line(line: &str) -> Result<(String, Record), ImportErrorKind> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| ImportErrorKind::InvalidJson(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(ImportErrorKind::NotARecord(line.to_string()));
    };

    let key = match object.remove(KEY_FIELD) {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ImportErrorKind::MissingJsonKey),
    };

    Ok((key, record_from_object(object)?))
}

/// Parse a whole document of the form `{ key: { field: value } }`
///
/// A document that fails to parse yields a single error on line 0. Entries
/// that are not flat records are reported individually, also on line 0.
pub fn parse_json_document(contents: &str) -> ParseOutput {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    if contents.trim().is_empty() {
        return (records, errors);
    }

    let document: Map<String, Value> = match serde_json::from_str(contents) {
        Ok(document) => document,
        Err(e) => {
            errors.push(LineError {
                line: 0,
                raw: String::new(),
                kind: ImportErrorKind::InvalidJson(e.to_string()),
            });
            return (records, errors);
        }
    };

    for (key, value) in document {
        let parsed = match value {
            Value::Object(object) => record_from_object(object),
            _ => Err(ImportErrorKind::NotARecord(key.clone())),
        };

        match parsed {
            Ok(record) => records.push((key, record)),
            Err(kind) => errors.push(LineError {
                line: 0,
                raw: key,
                kind,
            }),
        }
    }

    (records, errors)
}

fn record_from_object(object: Map<String, Value>) -> Result<Record, ImportErrorKind> {
    object
        .into_iter()
        .map(|(field, value)| match scalar_from_json(&value) {
            Some(value) => Ok((field, value)),
            None => Err(ImportErrorKind::NonScalarField(field)),
        })
        .collect()
}

fn scalar_from_json(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::String(s.clone())),
        Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(FieldValue::Integer(i))
            } else if let Some(u) = n.as_u64() {
                Some(FieldValue::Unsigned(u))
            } else {
                n.as_f64().map(FieldValue::Float)
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
