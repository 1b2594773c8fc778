//! Tolerant field extraction from a parsed settings tree.
//!
//! [`FieldReader`] wraps one JSON object and hands out typed fields.  A field
//! that is missing yields the caller's default; a field whose value has the
//! wrong shape is logged and also yields the default.  Neither aborts the
//! decode.  Keys nobody asked for are returned by [`FieldReader::unknown`] so
//! they can be written back verbatim.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::schema::ExtraFields;

/// A node of the settings tree that decodes itself field by field.
pub(crate) trait Section: Default {
    fn read(reader: &mut FieldReader<'_>) -> Self;
}

pub(crate) struct FieldReader<'a> {
    path: String,
    fields: &'a Map<String, Value>,
    seen: HashSet<&'static str>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(path: impl Into<String>, fields: &'a Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            fields,
            seen: HashSet::new(),
        }
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn take(&mut self, key: &'static str) -> Option<&'a Value> {
        self.seen.insert(key);
        let value = self.fields.get(key);
        if value.is_none() {
            debug!(field = %self.field_path(key), "field absent, using default");
        }
        value
    }

    /// Reads a scalar or array field.
    pub(crate) fn value<T: DeserializeOwned>(&mut self, key: &'static str, default: T) -> T {
        let Some(raw) = self.take(key) else {
            return default;
        };
        match T::deserialize(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(field = %self.field_path(key), error = %e, "malformed field, using default");
                default
            }
        }
    }

    /// Reads a nested object node.
    pub(crate) fn section<T: Section>(&mut self, key: &'static str) -> T {
        let path = self.field_path(key);
        match self.take(key) {
            None => T::default(),
            Some(Value::Object(map)) => T::read(&mut FieldReader::new(path, map)),
            Some(other) => {
                warn!(field = %path, found = kind_of(other), "expected an object, using default");
                T::default()
            }
        }
    }

    /// Reads an array of object nodes, skipping entries that are not objects.
    pub(crate) fn list<T: Section>(&mut self, key: &'static str) -> Vec<T> {
        let path = self.field_path(key);
        match self.take(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match item {
                    Value::Object(map) => {
                        Some(T::read(&mut FieldReader::new(format!("{path}[{i}]"), map)))
                    }
                    other => {
                        warn!(field = %path, index = i, found = kind_of(other), "skipping non-object entry");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                warn!(field = %path, found = kind_of(other), "expected an array, using default");
                Vec::new()
            }
        }
    }

    /// Returns every key of this node that no `value`/`section`/`list` call
    /// consumed.  Call it last.
    pub(crate) fn unknown(&self) -> ExtraFields {
        let extra: ExtraFields = self
            .fields
            .iter()
            .filter(|(k, _)| !self.seen.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !extra.is_empty() {
            debug!(node = %self.path, count = extra.len(), "preserving unknown keys");
        }
        extra
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
