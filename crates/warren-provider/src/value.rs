//! Dynamic scalar values for arguments and policy definitions.
//!
//! Broker argument tables are open maps of JSON scalars. [`Scalar`] keeps
//! the wire kind attached so a declared integer is written as a JSON
//! integer and read back as one, never silently widened to a float.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One argument value, tagged with its JSON kind.
///
/// Untagged variant order matters: booleans and integers must win over
/// the float arm so `true` and `3` keep their kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// The wire representation of this value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::from(*b),
            Scalar::Integer(n) => Value::from(*n),
            Scalar::Float(f) => Value::from(*f),
            Scalar::String(s) => Value::from(s.clone()),
        }
    }

    /// Re-tag a wire value. Integral JSON numbers become [`Scalar::Integer`];
    /// only genuinely fractional numbers become [`Scalar::Float`].
    /// Arrays, objects and null have no scalar form and yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(b) = value.as_bool() {
            Some(Scalar::Bool(b))
        } else if let Some(n) = value.as_i64() {
            Some(Scalar::Integer(n))
        } else if let Some(f) = value.as_f64() {
            Some(Scalar::Float(f))
        } else {
            value.as_str().map(|s| Scalar::String(s.to_string()))
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Encode a declared scalar map into a wire argument table.
#[must_use]
pub fn to_arguments(map: &BTreeMap<String, Scalar>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

/// Decode a wire argument table into a scalar map.
///
/// Entries whose values have no scalar form (nested tables, arrays, null)
/// are dropped from the typed view.
#[must_use]
pub fn from_arguments(map: &Map<String, Value>) -> BTreeMap<String, Scalar> {
    map.iter()
        .filter_map(|(key, value)| Scalar::from_json(value).map(|s| (key.clone(), s)))
        .collect()
}
