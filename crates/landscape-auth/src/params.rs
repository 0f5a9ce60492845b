//! Request parameter sets.
//!
//! A [`ParameterSet`] maps parameter names to either a single string or an
//! ordered list of strings. Names are kept in a `BTreeMap`, so iteration is
//! always in byte-wise ascending key order, which is the order the canonical
//! query is built in.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::AuthError;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A scalar string value, emitted as `name=value`.
    Single(String),
    /// An ordered sequence, emitted as `name.1=v0&name.2=v1...`.
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<&[&str]> for ParamValue {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_owned()).collect())
    }
}

/// Caller-supplied parameters for one API action.
///
/// # Examples
///
/// ```
/// use landscape_auth::params::{ParamValue, ParameterSet};
///
/// let params = ParameterSet::new()
///     .with("query", "needs:reboot")
///     .with("computer_ids", ["7", "9"].as_slice());
/// assert_eq!(params.len(), 2);
/// assert_eq!(params.get("query"), Some(&ParamValue::Single("needs:reboot".to_owned())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    inner: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style. A later value for the same name replaces
    /// the earlier one.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a parameter, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.inner.insert(name.into(), value.into())
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.get(name)
    }

    /// Whether a parameter with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of parameters (before flattening).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate parameters in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a parameter set from a JSON object.
    ///
    /// Each member must be a string or an array of strings.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidParameterType`] if the value is not an
    /// object, or if any member (or array element) has another JSON type.
    pub fn from_json(value: &Value) -> Result<Self, AuthError> {
        let Value::Object(map) = value else {
            return Err(AuthError::InvalidParameterType {
                name: "(parameters)".to_owned(),
                found: json_type_name(value),
            });
        };

        let mut params = Self::new();
        for (name, value) in map {
            let param = match value {
                Value::String(s) => ParamValue::Single(s.clone()),
                Value::Array(items) => ParamValue::List(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s.clone()),
                            other => Err(AuthError::InvalidParameterType {
                                name: name.clone(),
                                found: json_type_name(other),
                            }),
                        })
                        .collect::<Result<_, _>>()?,
                ),
                other => {
                    return Err(AuthError::InvalidParameterType {
                        name: name.clone(),
                        found: json_type_name(other),
                    });
                }
            };
            params.insert(name.clone(), param);
        }

        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_iterate_in_sorted_order_regardless_of_insertion() {
        let a: ParameterSet = [("zeta", "1"), ("alpha", "2"), ("Mid", "3")]
            .into_iter()
            .collect();
        let b: ParameterSet = [("Mid", "3"), ("zeta", "1"), ("alpha", "2")]
            .into_iter()
            .collect();

        let names: Vec<&str> = a.iter().map(|(k, _)| k).collect();
        // Byte-wise ordering puts uppercase before lowercase.
        assert_eq!(names, ["Mid", "alpha", "zeta"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_replace_value_on_reinsert() {
        let mut params = ParameterSet::new().with("query", "a");
        let previous = params.insert("query", "b");
        assert_eq!(previous, Some(ParamValue::Single("a".to_owned())));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_should_build_from_json_object() {
        let params = ParameterSet::from_json(&json!({
            "deliver_after": "2026-10-16T13:00:00Z",
            "computer_ids": ["7", "9"],
        }))
        .unwrap();

        assert_eq!(
            params.get("computer_ids"),
            Some(&ParamValue::List(vec!["7".to_owned(), "9".to_owned()]))
        );
        assert!(params.contains("deliver_after"));
    }

    #[test]
    fn test_should_reject_non_string_values() {
        let err = ParameterSet::from_json(&json!({ "limit": 10 })).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidParameterType { ref name, found: "number" } if name == "limit"
        ));

        let err = ParameterSet::from_json(&json!({ "computer_ids": ["7", 9] })).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidParameterType { found: "number", .. }
        ));

        let err = ParameterSet::from_json(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidParameterType { found: "array", .. }
        ));
    }
}
