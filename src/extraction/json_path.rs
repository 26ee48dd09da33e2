//! Typed optional path walk over nested record fields.
//!
//! Nested fields arrive either as decoded JSON objects or as JSON text that
//! has to be parsed first. Both are handled by [`nested_tree`]. Lookups never
//! fail hard: a missing field, unparsable text or a path that runs into a
//! non-object all end up as [`JsonLeaf::Missing`].

use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::core::RawRecord;

/// Shape of the value found at the end of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonLeaf {
    String(String),
    Bool(bool),
    Int(i64),
    /// Present but of a shape callers do not map: float, array, object, null.
    Other,
    Missing,
}

impl JsonLeaf {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => JsonLeaf::Missing,
            Some(Value::String(s)) => JsonLeaf::String(s.clone()),
            Some(Value::Bool(b)) => JsonLeaf::Bool(*b),
            Some(Value::Number(n)) => n.as_i64().map_or(JsonLeaf::Other, JsonLeaf::Int),
            Some(Value::Null | Value::Array(_) | Value::Object(_)) => JsonLeaf::Other,
        }
    }
}

/// The nested document stored under a top-level field.
///
/// Objects are borrowed as-is; strings are parsed as JSON. Anything that is
/// not, or does not decode to, an object yields `None`.
pub fn nested_tree<'a>(record: &'a RawRecord, field: &str) -> Option<Cow<'a, Value>> {
    match record.get(field)? {
        value @ Value::Object(_) => Some(Cow::Borrowed(value)),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Object(_)) => Some(Cow::Owned(parsed)),
            _ => None,
        },
        _ => None,
    }
}

/// Walk object keys from `root`. Stops at the first non-object or missing key.
pub fn walk<'v, S: AsRef<str>>(root: &'v Value, segments: &[S]) -> Option<&'v Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment.as_ref()))
}

/// Leaf at `path` inside the nested document under `field`.
pub fn leaf_at<S: AsRef<str>>(record: &RawRecord, field: &str, path: &[S]) -> JsonLeaf {
    match nested_tree(record, field) {
        Some(tree) => JsonLeaf::from_value(walk(&tree, path)),
        None => JsonLeaf::Missing,
    }
}

/// Nested documents of one record, each top-level field decoded at most once.
///
/// Several dimensions and counters read from the same encoded field; the
/// first lookup parses it and later lookups reuse the result, including a
/// failed parse.
pub struct NestedTrees<'a> {
    record: &'a RawRecord,
    parsed: HashMap<String, Option<Cow<'a, Value>>>,
}

impl<'a> NestedTrees<'a> {
    pub fn new(record: &'a RawRecord) -> Self {
        Self {
            record,
            parsed: HashMap::new(),
        }
    }

    /// The nested document under `field`, see [`nested_tree`].
    pub fn get(&mut self, field: &str) -> Option<&Value> {
        if !self.parsed.contains_key(field) {
            let tree = nested_tree(self.record, field);
            self.parsed.insert(field.to_string(), tree);
        }
        self.parsed.get(field).and_then(|tree| tree.as_deref())
    }

    /// Leaf at `path` inside the nested document under `field`.
    pub fn leaf<S: AsRef<str>>(&mut self, field: &str, path: &[S]) -> JsonLeaf {
        JsonLeaf::from_value(self.get(field).and_then(|tree| walk(tree, path)))
    }

    /// String at `path` inside the nested document under `field`.
    pub fn string<S: AsRef<str>>(&mut self, field: &str, path: &[S]) -> Option<String> {
        match self.leaf(field, path) {
            JsonLeaf::String(s) => Some(s),
            JsonLeaf::Bool(_) | JsonLeaf::Int(_) | JsonLeaf::Other | JsonLeaf::Missing => None,
        }
    }

    /// Number of distinct fields looked up so far.
    pub fn decoded_fields(&self) -> usize {
        self.parsed.len()
    }
}
