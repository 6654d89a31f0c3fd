//! Mapping between schemaless store records and typed models.
//!
//! Records coming out of the remote store may lack any field, carry `null`,
//! or hold a value of the wrong type. Parsing never fails on such input:
//! every field falls back to a default and only non-object records are
//! skipped.

use serde_json::{Map, Value};

/// Types that can be read from a store record.
pub trait FromRecord: Sized {
    /// Parse a record stored under `key`.
    ///
    /// Returns `None` when the record is not an object.
    fn from_record(key: &str, value: &Value) -> Option<Self>;
}

/// Types that can be written as a store record.
pub trait ToRecord {
    /// Build the persisted record.
    fn to_record(&self) -> Value;
}

/// Field accessors with defaults over a record object.
pub(crate) struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(Fields)
    }

    /// Non-empty string field.
    pub fn string_opt(&self, name: &str) -> Option<String> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn string_or_default(&self, name: &str) -> String {
        self.string_opt(name).unwrap_or_default()
    }

    /// Integer field; floats are truncated, numeric strings are accepted.
    pub fn i64_opt(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        match self.0.get(name) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }
}

/// Parse every child of a collection, skipping malformed entries.
pub fn parse_children<'a, T, I>(children: I) -> Vec<T>
where
    T: FromRecord,
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    children
        .into_iter()
        .filter_map(|(key, value)| {
            let parsed = T::from_record(key, value);
            if parsed.is_none() {
                log::debug!("Skipping malformed record {}", key);
            }
            parsed
        })
        .collect()
}
