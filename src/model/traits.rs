//! Typed accessors over trait maps.
//!
//! Trait values are arbitrary JSON node values; these helpers read the
//! shapes that well-known traits take without callers matching on
//! [`Value`] everywhere.

use serde_json::{Map, Value};

use super::ordered::OrderedMap;
use crate::base::constants::traits::DOCUMENTATION;

impl OrderedMap<Value> {
    /// Whether the trait is present at all (marker traits carry `{}`).
    pub fn has(&self, id: &str) -> bool {
        self.contains_key(id)
    }

    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Value::as_str)
    }

    pub fn get_i64(&self, id: &str) -> Option<i64> {
        self.get(id).and_then(Value::as_i64)
    }

    pub fn get_object(&self, id: &str) -> Option<&Map<String, Value>> {
        self.get(id).and_then(Value::as_object)
    }

    pub fn get_array(&self, id: &str) -> Option<&Vec<Value>> {
        self.get(id).and_then(Value::as_array)
    }

    /// String elements of an array-valued trait; non-strings are skipped.
    pub fn get_string_array(&self, id: &str) -> Vec<&str> {
        self.get_array(id)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.get_str(DOCUMENTATION)
    }

    /// Add documentation text to the single documentation slot. Text already
    /// present (from a `///` block or `@documentation`) is kept and the new
    /// text is appended on its own line.
    pub fn attach_documentation(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let merged = match self.documentation() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{text}"),
            _ => text.to_string(),
        };
        self.put(DOCUMENTATION, Value::String(merged));
    }
}

/// Read a field of a trait's object value as a string.
pub fn field_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}
