//! Dimension value extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::json_path::{leaf_at, JsonLeaf};
use crate::config::Dimension;
use crate::core::RawRecord;

// ASCII digits only; `\d` would also accept other Unicode digits.
static BUILD_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{14}$").expect("valid build id pattern"));

/// Literal the compositor dimension uses to mean "no compositor".
const NO_COMPOSITOR: &str = "none";

/// Whether a build id is exactly fourteen decimal digits.
pub fn is_valid_build_id(value: &str) -> bool {
    BUILD_ID_PATTERN.is_match(value)
}

/// Map a leaf to a dimension value.
pub fn leaf_to_dimension(leaf: JsonLeaf, is_compositor: bool) -> Option<String> {
    match leaf {
        JsonLeaf::String(s) if is_compositor && s == NO_COMPOSITOR => None,
        JsonLeaf::String(s) => Some(s),
        JsonLeaf::Bool(true) => Some("True".to_string()),
        JsonLeaf::Bool(false) => Some("False".to_string()),
        JsonLeaf::Int(i) => Some(i.to_string()),
        JsonLeaf::Other | JsonLeaf::Missing => None,
    }
}

/// Value of one dimension for a record.
///
/// Flat fields use their string value verbatim; numbers and booleans at the
/// top level follow the same rendering as nested leaves. Nested paths parse
/// the top-level field and walk the rest.
pub fn extract_dimension(
    record: &RawRecord,
    dimension: &Dimension,
    is_compositor: bool,
) -> Option<String> {
    let field = dimension.field()?;
    if dimension.is_nested() {
        return leaf_to_dimension(leaf_at(record, field, dimension.nested_path()), is_compositor);
    }
    match record.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        other => leaf_to_dimension(JsonLeaf::from_value(other), is_compositor),
    }
}
