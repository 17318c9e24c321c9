//! Field access for row types.
//!
//! Rows are opaque to the engines: all they need is a way to read a named
//! field as a [`Value`]. [`Record`] is that accessor, implemented for JSON
//! objects out of the box.

use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// A row whose fields can be read by name.
///
/// # Manual Implementation
///
/// ```
/// use gridview_query::{Number, Record, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn field(&self, key: &str) -> Value<'_> {
///         match key {
///             "name" => Value::from(self.name.as_str()),
///             "priority" => Value::Number(Number::U64(self.priority as u64)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let task = Task { name: "Write docs".into(), priority: 3 };
/// assert_eq!(task.field("name").as_str(), Some("Write docs"));
/// assert!(task.field("missing").is_none());
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] when absent.
    fn field(&self, key: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, key: &str) -> Value<'_> {
        (**self).field(key)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Value<'_> {
        self.get(key).map_or(Value::None, Value::from_json)
    }
}

impl Record for serde_json::Value {
    fn field(&self, key: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.field(key),
            _ => Value::None,
        }
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, key: &str) -> Value<'_> {
        self.get(key)
            .map_or(Value::None, |s| Value::from(s.as_str()))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Value<'_> {
        self.get(key)
            .map_or(Value::None, |s| Value::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;
    use serde_json::json;

    #[test]
    fn json_object_fields() {
        let row = json!({"id": 7, "name": "Ada", "active": true, "note": null});
        assert_eq!(row.field("id"), Value::Number(Number::I64(7)));
        assert_eq!(row.field("name").as_str(), Some("Ada"));
        assert_eq!(row.field("active"), Value::Bool(true));
        assert!(row.field("note").is_none());
        assert!(row.field("missing").is_none());
    }

    #[test]
    fn non_object_json_has_no_fields() {
        assert!(json!([1, 2]).field("0").is_none());
    }

    #[test]
    fn string_maps() {
        let mut row = HashMap::new();
        row.insert("city".to_string(), "Oslo".to_string());
        assert_eq!(row.field("city").as_str(), Some("Oslo"));
        assert_eq!((&row).field("city").as_str(), Some("Oslo"));
    }
}
