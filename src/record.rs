//! Record Model
//!
//! The in-memory shape of a collection.
//!
//! ```text
//! Collection  = { Key -> Entry }
//! Entry       = Record | Scalar
//! Record      = { field -> FieldValue }
//! FieldValue  = Integer | Unsigned | Float | Boolean | String
//! ```
//!
//! Both maps are `BTreeMap`s, so keys and fields iterate in sorted order and
//! every serializer writes them sorted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A flat mapping of field name to scalar value
pub type Record = BTreeMap<String, FieldValue>;

/// All entries of one collection, keyed by record key
pub type Collection = BTreeMap<String, Entry>;

/// A single scalar field value
///
/// Variant order matters for untagged deserialization: integers must be
/// tried before floats so `30` stays an integer, and `Unsigned` catches
/// whole numbers above `i64::MAX` that would otherwise round to a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl FieldValue {
    /// Coerce raw text: integer, then finite float, else string
    ///
    /// Whole numbers outside `i64`/`u64` stay strings rather than being
    /// rounded to a float.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(u) = raw.parse::<u64>() {
            return FieldValue::Unsigned(u);
        }
        if is_integer_literal(raw) {
            return FieldValue::String(raw.to_string());
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => FieldValue::Float(f),
            _ => FieldValue::String(raw.to_string()),
        }
    }
}

/// Optional sign followed by at least one ASCII digit
fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Unsigned(u) => write!(f, "{}", u),
            // Debug keeps the fractional part: 3.0 prints as "3.0", not "3"
            FieldValue::Float(x) => write!(f, "{:?}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// One value stored under a collection key
///
/// Files written by this crate only ever hold records. Hand-edited files
/// may carry a bare scalar; it survives load/save and `set` replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Record(Record),
    Scalar(FieldValue),
}

impl Entry {
    /// Borrow the record, if this entry is one
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Entry::Record(record) => Some(record),
            Entry::Scalar(_) => None,
        }
    }

    /// Take the record, if this entry is one
    pub fn into_record(self) -> Option<Record> {
        match self {
            Entry::Record(record) => Some(record),
            Entry::Scalar(_) => None,
        }
    }
}

impl From<Record> for Entry {
    fn from(record: Record) -> Self {
        Entry::Record(record)
    }
}

/// Build a record from `(field, value)` pairs
pub fn record<K, V, I>(fields: I) -> Record
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Merge `fields` into `existing`: new fields added, overlapping fields
/// overwritten, untouched fields kept
pub fn merge_into(existing: &mut Record, fields: Record) {
    existing.extend(fields);
}
