//! Exact-match query filter built from request query parameters.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::Document;

/// Conditions name top-level fields only. Dotted paths such as
/// `contacts.type` and matches against array elements are not supported;
/// such a condition matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: BTreeMap<String, String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every condition must hold against the document's top-level field.
    pub fn matches(&self, document: &Document) -> bool {
        self.iter().all(|(field, expected)| {
            document
                .get(field)
                .is_some_and(|value| value_matches(value, expected))
        })
    }
}

/// Numeric reading of a filter value; non-finite values never match.
pub fn numeric_value(expected: &str) -> Option<f64> {
    expected.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Strings and booleans compare by text, numbers by value. Arrays, objects
/// and null never match.
fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Bool(b) => expected == if *b { "true" } else { "false" },
        Value::Number(n) => match (n.as_f64(), numeric_value(expected)) {
            (Some(actual), Some(wanted)) => actual == wanted,
            _ => false,
        },
        _ => false,
    }
}

impl From<HashMap<String, String>> for Filter {
    fn from(params: HashMap<String, String>) -> Self {
        params.into_iter().collect()
    }
}

impl FromIterator<(String, String)> for Filter {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({"name": "MIT"}))));
        assert!(Filter::new().matches(&Document::new()));
    }

    #[test]
    fn test_string_match_is_exact() {
        let filter = Filter::new().with("name", "MIT");
        assert!(filter.matches(&doc(json!({"name": "MIT"}))));
        assert!(!filter.matches(&doc(json!({"name": "MIT Sloan"}))));
        assert!(!filter.matches(&doc(json!({"name": "mit"}))));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let filter = Filter::new().with("fees", "50000");
        assert!(filter.matches(&doc(json!({"fees": 50000}))));
        assert!(filter.matches(&doc(json!({"fees": 50000.0}))));
        assert!(!filter.matches(&doc(json!({"fees": 50001}))));
        assert!(!filter.matches(&doc(json!({"fees": null}))));
        assert!(!Filter::new().with("fees", "NaN").matches(&doc(json!({"fees": 1}))));
    }

    #[test]
    fn test_missing_field_and_arrays_never_match() {
        let filter = Filter::new().with("address", "Boston");
        assert!(!filter.matches(&doc(json!({"name": "MIT"}))));

        let filter = Filter::new().with("contacts", "[]");
        assert!(!filter.matches(&doc(json!({"contacts": []}))));
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let filter = Filter::new().with("name", "MIT").with("address", "Cambridge");
        assert!(filter.matches(&doc(json!({"name": "MIT", "address": "Cambridge"}))));
        assert!(!filter.matches(&doc(json!({"name": "MIT", "address": "Boston"}))));
    }

    #[test]
    fn test_dotted_paths_match_nothing() {
        let filter = Filter::new().with("contacts.type", "website");
        let document = doc(json!({"contacts": [{"type": "website", "value": "https://mit.edu"}]}));
        assert!(!filter.matches(&document));
    }

    #[test]
    fn test_booleans_compare_by_text() {
        let filter = Filter::new().with("public", "true");
        assert!(filter.matches(&doc(json!({"public": true}))));
        assert!(!filter.matches(&doc(json!({"public": false}))));
    }
}
