use crate::domain::model::{ClonePolicy, CloneOptions};
use crate::domain::value::{Object, PlainValue, Walk};
use crate::utils::error::{Result, UtilsError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Copies `value` into freshly allocated containers with the default options.
pub fn deep_clone(value: &PlainValue) -> Result<PlainValue> {
    deep_clone_with(value, &CloneOptions::default())
}

/// Copies `value` into freshly allocated containers.
///
/// No container of the result is reachable from `value`. A container that
/// appears at several places in `value` is copied once per appearance, so the
/// result has no internal sharing either. Cycles, nesting past
/// `options.max_depth` and, under [`ClonePolicy::Strict`], non-finite numbers
/// fail with [`UtilsError::SerializationError`].
pub fn deep_clone_with(value: &PlainValue, options: &CloneOptions) -> Result<PlainValue> {
    let mut cloner = Cloner {
        walk: Walk::new(options.max_depth),
        policy: options.policy,
        containers: 0,
    };
    let copy = cloner.copy(value)?;
    tracing::debug!(containers = cloner.containers, "deep clone complete");
    Ok(copy)
}

/// Clones through JSON text, one full serialize and one full parse.
///
/// Finite numbers come back bit-for-bit, except that `-0` is written as `0`.
/// The parser stops at 128 levels of nesting whatever `options.max_depth` says.
pub fn deep_clone_text(value: &PlainValue, options: &CloneOptions) -> Result<PlainValue> {
    let json = value.to_json(options)?;
    let text = serde_json::to_string(&json)?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;
    Ok(PlainValue::from_json(&parsed))
}

/// Clones any serde type by round-tripping it through `serde_json::Value`.
///
/// Non-finite floats become null on the way out, which fails on the way back
/// unless the field accepts null.
pub fn deep_clone_serde<T: Serialize + DeserializeOwned>(value: &T) -> Result<T> {
    let json = serde_json::to_value(value)
        .map_err(|e| UtilsError::serialization("$", e.to_string()))?;
    serde_json::from_value(json).map_err(|e| UtilsError::serialization("$", e.to_string()))
}

struct Cloner {
    walk: Walk,
    policy: ClonePolicy,
    containers: usize,
}

impl Cloner {
    fn copy(&mut self, value: &PlainValue) -> Result<PlainValue> {
        match value {
            PlainValue::Null => Ok(PlainValue::Null),
            PlainValue::Bool(b) => Ok(PlainValue::Bool(*b)),
            PlainValue::Number(n) => Ok(self
                .walk
                .number(*n, self.policy)?
                .map(PlainValue::Number)
                .unwrap_or(PlainValue::Null)),
            PlainValue::String(s) => Ok(PlainValue::String(s.clone())),
            PlainValue::Array(items) => {
                let items = self.walk.enter(items)?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.walk.push_index(index);
                    out.push(self.copy(item)?);
                    self.walk.pop_segment();
                }
                self.walk.leave();
                self.containers += 1;
                Ok(PlainValue::array(out))
            }
            PlainValue::Object(entries) => {
                let entries = self.walk.enter(entries)?;
                let mut out = Object::new();
                for (key, item) in entries.iter() {
                    self.walk.push_key(key);
                    out.insert(key.clone(), self.copy(item)?);
                    self.walk.pop_segment();
                }
                self.walk.leave();
                self.containers += 1;
                Ok(PlainValue::object(out))
            }
        }
    }
}
