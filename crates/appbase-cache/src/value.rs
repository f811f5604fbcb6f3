//! Cached value model.
//!
//! Every value that reaches the store is one of a closed set of categories,
//! each with its own on-the-wire shape:
//!
//! | Category | Stored as |
//! |----------|-----------|
//! | [`CacheValue::Structured`] (map / list) | compact JSON string entry with expiry |
//! | [`CacheValue::Set`] | native Redis set, expiry only when given explicitly |
//! | [`CacheValue::Int`], [`CacheValue::Float`], [`CacheValue::Text`] | plain string entry with expiry |

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::CacheError;

/// A value that can be written to or read from the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    /// A JSON object or array.
    Structured(Value),
    /// An unordered collection of members.
    Set(HashSet<String>),
    Int(i64),
    Float(f64),
    Text(String),
}

/// The type a caller expects to read back from a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValueKind {
    #[default]
    Map,
    List,
    Set,
    Int,
    Float,
    Text,
}

/// The store-level shape of an encoded [`CacheValue`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Encoded {
    /// A single string entry.
    Text(String),
    /// Members of a set entry.
    Members(Vec<String>),
}

impl CacheValue {
    /// Returns the kind this value reads back as.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Structured(Value::Array(_)) => ValueKind::List,
            Self::Structured(_) => ValueKind::Map,
            Self::Set(_) => ValueKind::Set,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&HashSet<String>> {
        match self {
            Self::Set(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Deserializes a structured value into `T`.
    ///
    /// Scalars and sets go through their JSON form, so `Int(5)` deserializes
    /// into any integer type and a set into a `Vec<String>` or `HashSet<String>`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_json())
    }

    /// Converts the value into plain JSON. Set members are sorted.
    pub fn into_json(self) -> Value {
        match self {
            Self::Structured(value) => value,
            Self::Set(members) => {
                let sorted: BTreeSet<String> = members.into_iter().collect();
                Value::Array(sorted.into_iter().map(Value::String).collect())
            }
            Self::Int(value) => Value::from(value),
            Self::Float(value) => Value::from(value),
            Self::Text(value) => Value::String(value),
        }
    }

    pub(crate) fn encode(&self) -> Result<Encoded, CacheError> {
        match self {
            Self::Structured(value) => {
                if !(value.is_object() || value.is_array()) {
                    return Err(CacheError::UnsupportedType(json_type_name(value).into()));
                }
                let text = serde_json::to_string(value)
                    .map_err(|e| CacheError::UnsupportedType(e.to_string()))?;
                Ok(Encoded::Text(text))
            }
            Self::Set(members) => Ok(Encoded::Members(members.iter().cloned().collect())),
            Self::Int(value) => Ok(Encoded::Text(value.to_string())),
            Self::Float(value) => Ok(Encoded::Text(value.to_string())),
            Self::Text(value) => Ok(Encoded::Text(value.clone())),
        }
    }

    /// Decodes a string entry into the requested kind.
    ///
    /// `Map` and `List` both accept any JSON object or array; only malformed
    /// text or a bare JSON scalar is an error.
    pub(crate) fn decode(key: &str, kind: ValueKind, raw: &str) -> Result<Self, CacheError> {
        match kind {
            ValueKind::Map | ValueKind::List => {
                let value: Value =
                    serde_json::from_str(raw).map_err(|e| CacheError::deserialization(key, e))?;
                if !(value.is_object() || value.is_array()) {
                    return Err(CacheError::deserialization(
                        key,
                        format!("expected JSON object or array, found {}", json_type_name(&value)),
                    ));
                }
                Ok(Self::Structured(value))
            }
            ValueKind::Int => raw
                .parse()
                .map(Self::Int)
                .map_err(|e| CacheError::deserialization(key, e)),
            ValueKind::Float => raw
                .parse()
                .map(Self::Float)
                .map_err(|e| CacheError::deserialization(key, e)),
            ValueKind::Text => Ok(Self::Text(raw.to_string())),
            ValueKind::Set => Err(CacheError::deserialization(
                key,
                "set entries are not stored as strings",
            )),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion into a [`CacheValue`].
///
/// Values outside the supported categories fail with
/// [`CacheError::UnsupportedType`]; the conversion happens before any store
/// operation is issued.
pub trait IntoCacheValue {
    fn into_cache_value(self) -> Result<CacheValue, CacheError>;
}

/// Wraps any serde-serializable value for caching.
///
/// The value's JSON form decides its category: objects and arrays are
/// structured, numbers and strings are scalars, everything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl IntoCacheValue for CacheValue {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(self)
    }
}

impl IntoCacheValue for Value {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        match self {
            Value::Object(_) | Value::Array(_) => Ok(CacheValue::Structured(self)),
            Value::String(text) => Ok(CacheValue::Text(text)),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(CacheValue::Int(int))
                } else if number.is_u64() {
                    Err(CacheError::UnsupportedType(format!(
                        "integer {number} out of range"
                    )))
                } else {
                    number
                        .as_f64()
                        .map(CacheValue::Float)
                        .ok_or_else(|| CacheError::UnsupportedType(number.to_string()))
                }
            }
            other => Err(CacheError::UnsupportedType(json_type_name(&other).into())),
        }
    }
}

impl<T: Serialize> IntoCacheValue for Json<T> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        serde_json::to_value(&self.0)
            .map_err(|e| CacheError::UnsupportedType(e.to_string()))?
            .into_cache_value()
    }
}

macro_rules! int_into_cache_value {
    ($($ty:ty),*) => {
        $(
            impl IntoCacheValue for $ty {
                fn into_cache_value(self) -> Result<CacheValue, CacheError> {
                    i64::try_from(self)
                        .map(CacheValue::Int)
                        .map_err(|_| {
                            CacheError::UnsupportedType(format!("integer {self} out of range"))
                        })
                }
            }
        )*
    };
}

int_into_cache_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl IntoCacheValue for f64 {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Float(self))
    }
}

impl IntoCacheValue for f32 {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Float(f64::from(self)))
    }
}

impl IntoCacheValue for String {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Text(self))
    }
}

impl IntoCacheValue for &str {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Text(self.to_string()))
    }
}

impl IntoCacheValue for HashSet<String> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Set(self))
    }
}

impl IntoCacheValue for BTreeSet<String> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Ok(CacheValue::Set(self.into_iter().collect()))
    }
}

impl<T: Serialize> IntoCacheValue for Vec<T> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Json(self).into_cache_value()
    }
}

impl<V: Serialize> IntoCacheValue for HashMap<String, V> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Json(self).into_cache_value()
    }
}

impl<V: Serialize> IntoCacheValue for BTreeMap<String, V> {
    fn into_cache_value(self) -> Result<CacheValue, CacheError> {
        Json(self).into_cache_value()
    }
}
