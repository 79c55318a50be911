//! Keyed envelope arguments.
//!
//! Values keep their JSON type after decode; coercion to a Rust type only
//! happens when a caller asks for one through [`KwargStore::get`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{BridgeError, Result};

/// Nested kwarg mapping.
pub type KwargMap = BTreeMap<String, KwargValue>;

/// One dynamically typed kwarg value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KwargValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<KwargValue>),
    Map(KwargMap),
}

impl KwargValue {
    /// JSON type name, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            KwargValue::Null => "null",
            KwargValue::Bool(_) => "bool",
            KwargValue::Number(_) => "number",
            KwargValue::String(_) => "string",
            KwargValue::List(_) => "list",
            KwargValue::Map(_) => "map",
        }
    }
}

impl From<bool> for KwargValue {
    fn from(v: bool) -> Self {
        KwargValue::Bool(v)
    }
}

impl From<&str> for KwargValue {
    fn from(v: &str) -> Self {
        KwargValue::String(v.to_owned())
    }
}

impl From<String> for KwargValue {
    fn from(v: String) -> Self {
        KwargValue::String(v)
    }
}

impl From<i64> for KwargValue {
    fn from(v: i64) -> Self {
        KwargValue::Number(v.into())
    }
}

impl From<i32> for KwargValue {
    fn from(v: i32) -> Self {
        KwargValue::Number(v.into())
    }
}

impl From<u64> for KwargValue {
    fn from(v: u64) -> Self {
        KwargValue::Number(v.into())
    }
}

impl From<f64> for KwargValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(v: f64) -> Self {
        Number::from_f64(v).map_or(KwargValue::Null, KwargValue::Number)
    }
}

impl From<KwargMap> for KwargValue {
    fn from(v: KwargMap) -> Self {
        KwargValue::Map(v)
    }
}

impl From<Vec<KwargValue>> for KwargValue {
    fn from(v: Vec<KwargValue>) -> Self {
        KwargValue::List(v)
    }
}

/// Typed view over a [`KwargValue`].
///
/// Implementations match on the tag and return `None` on mismatch; there is
/// no cross-type coercion (a JSON `true` is never a string).
pub trait FromKwarg: Sized {
    /// Name of the accepted JSON type, reported on mismatch.
    const EXPECTED: &'static str;

    fn from_kwarg(value: &KwargValue) -> Option<Self>;
}

impl FromKwarg for KwargValue {
    const EXPECTED: &'static str = "any";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromKwarg for String {
    const EXPECTED: &'static str = "string";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromKwarg for bool {
    const EXPECTED: &'static str = "bool";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromKwarg for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

impl FromKwarg for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

impl FromKwarg for f64 {
    const EXPECTED: &'static str = "number";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl FromKwarg for KwargMap {
    const EXPECTED: &'static str = "map";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::Map(m) => Some(m.clone()),
            _ => None,
        }
    }
}

impl FromKwarg for Vec<KwargValue> {
    const EXPECTED: &'static str = "list";

    fn from_kwarg(value: &KwargValue) -> Option<Self> {
        match value {
            KwargValue::List(l) => Some(l.clone()),
            _ => None,
        }
    }
}

/// Keyed argument storage of one envelope.
///
/// An empty store serializes as `{}`; the backing map does not allocate
/// until the first insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KwargStore {
    entries: KwargMap,
}

impl KwargStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed read. Absent keys are an error, never a default.
    pub fn get<T: FromKwarg>(&self, key: &str) -> Result<T> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| BridgeError::KwargMissing(key.to_owned()))?;
        T::from_kwarg(value).ok_or_else(|| BridgeError::KwargType {
            key: key.to_owned(),
            expected: T::EXPECTED,
            found: value.type_name(),
        })
    }

    /// Typed read where absence is acceptable. A present value of the wrong
    /// type is still an error.
    pub fn get_opt<T: FromKwarg>(&self, key: &str) -> Result<Option<T>> {
        if !self.has(key) {
            return Ok(None);
        }
        self.get(key).map(Some)
    }

    /// Insert or replace.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<KwargValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw value access without coercion.
    pub fn raw(&self, key: &str) -> Option<&KwargValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KwargValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
