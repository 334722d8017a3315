use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Mask printed in place of secret parameter values.
pub const REDACTED: &str = "********";

/// A scalar request parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A plain string.
    Str(String),
    /// An integer.
    Int(i64),
    /// A boolean, sent as `True` / `False`.
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Bool(true) => f.write_str("True"),
            ParamValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

macro_rules! int_param {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    ParamValue::Int(value as i64)
                }
            }
        )*
    };
}

int_param!(i32, i64, u16, u32, usize);

/// A collection of parameters for a request.
///
/// GET requests send these as query arguments, POST requests as a form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: BTreeMap<String, ParamValue>,
}

impl Parameters {
    /// Creates a new empty collection of parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the collection
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Adds a parameter only if a value is present
    pub fn param_opt<K, V>(self, key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Adds multiple parameters to the collection
    pub fn extend<I, K, V>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (k, v) in iter {
            self.inner.insert(k.into(), v.into());
        }
        self
    }

    /// Returns a new collection with every entry of `self`, where keys present in
    /// `overrides` take the override's value.
    ///
    /// `self` is left untouched so it can keep serving as the base for later calls.
    pub fn merged(&self, overrides: &Parameters) -> Parameters {
        let mut inner = self.inner.clone();
        inner.extend(
            overrides
                .inner
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Parameters { inner }
    }

    /// Returns a copy with the value of `key` replaced by a mask, for printing.
    pub fn redacted(&self, key: &str) -> Parameters {
        let mut inner = self.inner.clone();
        if let Some(value) = inner.get_mut(key) {
            *value = ParamValue::Str(REDACTED.to_string());
        }
        Parameters { inner }
    }

    /// Returns the value for `key`
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.inner.get(key)
    }

    /// Returns whether `key` is set
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.inner.iter()
    }

    /// Returns the parameters rendered to their wire strings
    pub fn to_wire(&self) -> Vec<(String, String)> {
        self.inner
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (k, v) in &self.inner {
            map.serialize_entry(k, &v.to_string())?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
