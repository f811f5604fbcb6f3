//! Cache key derivation for memoized functions.
//!
//! A memoized target declares its parameters up front with a [`Signature`].
//! Each call's [`CallArgs`] are bound against that signature (positional
//! first, then by name, then declared defaults) and the bound values are
//! rendered into a key of the form `name:param=value:param=value`.
//!
//! Binding is order-independent: `f(1)` and `f(a=1)` bind identically and
//! therefore share a key.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::CacheError;

/// Separator between key segments.
pub const KEY_DELIMITER: &str = ":";

/// Parameter name reserved for a bound-method receiver.
pub const RECEIVER: &str = "self";

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Declared name and parameter list of a memoized target.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declares the receiver slot. It binds a positional argument like any
    /// other parameter but never contributes to the cache key.
    pub fn receiver(self) -> Self {
        self.required(RECEIVER)
    }

    /// Declares a parameter without a default.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declares a parameter with a default applied when the caller omits it.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Binds call arguments to the declared parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Binding`] for too many positional arguments, an
    /// unknown or duplicated named argument, or a missing required parameter.
    pub fn bind(&self, args: &CallArgs) -> Result<BoundArgs, CacheError> {
        if args.positional.len() > self.params.len() {
            return Err(CacheError::binding(
                &self.name,
                format!(
                    "takes {} positional arguments but {} were given",
                    self.params.len(),
                    args.positional.len()
                ),
            ));
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(&args.positional) {
            *slot = Some(value.clone());
        }

        for (name, value) in &args.named {
            let Some(index) = self.params.iter().position(|p| &p.name == name) else {
                return Err(CacheError::binding(
                    &self.name,
                    format!("got an unexpected keyword argument '{name}'"),
                ));
            };
            if slots[index].is_some() {
                return Err(CacheError::binding(
                    &self.name,
                    format!("got multiple values for argument '{name}'"),
                ));
            }
            slots[index] = Some(value.clone());
        }

        let mut values = Vec::with_capacity(self.params.len());
        for (param, slot) in self.params.iter().zip(slots) {
            let value = match slot.or_else(|| param.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(CacheError::binding(
                        &self.name,
                        format!("missing a required argument: '{}'", param.name),
                    ));
                }
            };
            values.push((param.name.clone(), value));
        }

        Ok(BoundArgs { values })
    }
}

/// Arguments of a single call, before binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a named argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }
}

/// Arguments bound to a [`Signature`], in declaration order, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Reads a bound argument as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Binding`] when the parameter does not exist or
    /// its value does not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, CacheError> {
        let value = self
            .value(name)
            .ok_or_else(|| CacheError::binding(name, "no such parameter"))?;
        serde_json::from_value(value.clone()).map_err(|e| CacheError::binding(name, e.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Derives the cache key for a bound call.
///
/// Starts with the signature name and appends `name=value` for every bound
/// parameter in declaration order, skipping the receiver and anything in
/// `ignore`.
pub fn derive_key(signature: &Signature, bound: &BoundArgs, ignore: &[String]) -> String {
    let mut parts = vec![signature.name().to_string()];

    for (name, value) in bound.iter() {
        if name == RECEIVER || ignore.iter().any(|ignored| ignored == name) {
            continue;
        }
        parts.push(format!("{}={}", name, render(value)));
    }

    parts.join(KEY_DELIMITER)
}

/// Strings render without quotes; everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
