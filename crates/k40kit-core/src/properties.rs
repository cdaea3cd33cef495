//! Loosely-typed property maps
//!
//! Operation settings and element attributes arrive from loaders and UIs
//! as untyped key/value pairs. [`Properties`] stores them as JSON values and
//! exposes one coercion rule per target type. The strict readers return a
//! [`PropertyError`]; the `lenient_*` readers turn any failure into `None`
//! so a setter can keep its previous value.
//!
//! Coercion rules:
//! - float: numbers, numeric strings (surrounding whitespace ignored), and
//!   booleans as `1.0`/`0.0`.
//! - int: integral numbers, other finite numbers truncated toward zero,
//!   strings that parse as an integer, and booleans as `1`/`0`.
//! - flag: booleans, numbers (non-zero is true), and the strings
//!   `true/yes/on/1` or `false/no/off/0/""` in any case.

use crate::error::PropertyError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered map of loosely-typed values keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read `key` as a float.
    pub fn float(&self, key: &str) -> Result<f64, PropertyError> {
        let value = self.require(key)?;
        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| invalid(key, value, "float")),
            Value::String(s) => s.trim().parse().map_err(|_| invalid(key, value, "float")),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => Err(invalid(key, value, "float")),
        }
    }

    /// Read `key` as an integer.
    pub fn int(&self, key: &str) -> Result<i64, PropertyError> {
        let value = self.require(key)?;
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i);
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                    Some(_) => Err(PropertyError::OutOfRange {
                        key: key.to_string(),
                        value: value.to_string(),
                    }),
                    None => Err(invalid(key, value, "integer")),
                }
            }
            Value::String(s) => s.trim().parse().map_err(|_| invalid(key, value, "integer")),
            Value::Bool(b) => Ok(i64::from(*b)),
            _ => Err(invalid(key, value, "integer")),
        }
    }

    /// Read `key` as a boolean flag.
    pub fn flag(&self, key: &str) -> Result<bool, PropertyError> {
        let value = self.require(key)?;
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" | "" => Ok(false),
                _ => Err(invalid(key, value, "boolean")),
            },
            _ => Err(invalid(key, value, "boolean")),
        }
    }

    /// Float value, or `None` when absent or not coercible.
    pub fn lenient_float(&self, key: &str) -> Option<f64> {
        lenient(self.float(key))
    }

    /// Integer value, or `None` when absent or not coercible.
    pub fn lenient_int(&self, key: &str) -> Option<i64> {
        lenient(self.int(key))
    }

    /// Flag value, or `None` when absent or not coercible.
    pub fn lenient_flag(&self, key: &str) -> Option<bool> {
        lenient(self.flag(key))
    }

    fn require(&self, key: &str) -> Result<&Value, PropertyError> {
        self.0.get(key).ok_or_else(|| PropertyError::Missing {
            key: key.to_string(),
        })
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn invalid(key: &str, value: &Value, expected: &'static str) -> PropertyError {
    PropertyError::InvalidType {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn lenient<T>(result: Result<T, PropertyError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(PropertyError::Missing { .. }) => None,
        Err(err) => {
            tracing::debug!("Ignoring property: {}", err);
            None
        }
    }
}
