use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value as JsonValue;

/// Read-only view of a persisted record, as handed over by the persistence layer.
///
/// Values are exposed as text because validation happens on the raw attribute
/// value, before any type casting.
pub trait Record {
    /// Returns the current value of `field`, or `None` when the field is unset.
    fn value_of(&self, field: &str) -> Option<Cow<'_, str>>;

    /// Whether `field` holds a non-blank value.
    fn is_present(&self, field: &str) -> bool {
        !is_blank(self.value_of(field).as_deref())
    }
}

/// A value is blank when it is absent or contains only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

impl Record for () {
    fn value_of(&self, _field: &str) -> Option<Cow<'_, str>> {
        None
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn value_of(&self, field: &str) -> Option<Cow<'_, str>> {
        (**self).value_of(field)
    }
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn value_of(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for BTreeMap<String, String> {
    fn value_of(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for serde_json::Map<String, JsonValue> {
    fn value_of(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.get(field)? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            JsonValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            JsonValue::Number(n) => Some(Cow::Owned(n.to_string())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}
