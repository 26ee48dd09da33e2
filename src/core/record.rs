//! Raw telemetry records as handed over by a record source.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One raw telemetry record: field name to value.
///
/// Values are either flat scalars or nested documents. Nested documents may
/// arrive already decoded (a JSON object) or still encoded as a JSON string;
/// the extraction layer handles both. A field holding `null` is treated as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for constructing fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field, treating explicit `null` as missing.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// String value of a flat field, if the field is a string.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for RawRecord {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_are_absent() {
        let record = RawRecord::new()
            .with_field("docType", "crash")
            .with_field("subsessionLength", Value::Null);

        assert!(record.contains("docType"));
        assert!(!record.contains("subsessionLength"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_text_only_returns_strings() {
        let record = RawRecord::new()
            .with_field("geoCountry", "DE")
            .with_field("subsessionLength", 3600);

        assert_eq!(record.text("geoCountry"), Some("DE"));
        assert_eq!(record.text("subsessionLength"), None);
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(RawRecord::try_from(json!({"docType": "main"})).is_ok());
        assert_eq!(RawRecord::try_from(json!([1, 2])), Err(json!([1, 2])));
    }
}
