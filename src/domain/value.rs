//! Plain data values with shared, mutable containers.
//!
//! Arrays and objects sit behind `Rc<RefCell<..>>`, so one container can be
//! reachable from several places and can even contain itself. `Clone` on a
//! [`PlainValue`] is shallow: the new value points at the same containers.
//! Use [`crate::core::clone::deep_clone`] for an independent copy.
//!
//! The derived `Debug` and `PartialEq` impls recurse without cycle checks and
//! must only be used on acyclic values.

use crate::domain::model::{ClonePolicy, CloneOptions};
use crate::utils::error::{Result, UtilsError};
use serde_json::{Map, Number, Value};
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub type Shared<T> = Rc<RefCell<T>>;
pub type Array = Vec<PlainValue>;
pub type Object = BTreeMap<String, PlainValue>;

/// Integers up to 2^53 survive an `f64` exactly and are written without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Shared<Array>),
    Object(Shared<Object>),
}

impl PlainValue {
    pub fn array(items: impl IntoIterator<Item = PlainValue>) -> Self {
        PlainValue::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, PlainValue)>) -> Self {
        PlainValue::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    pub fn as_array(&self) -> Option<&Shared<Array>> {
        match self {
            PlainValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Shared<Object>> {
        match self {
            PlainValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PlainValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlainValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Member of an object, sharing its containers with `self`.
    pub fn get(&self, key: &str) -> Option<PlainValue> {
        self.as_object()?.borrow().get(key).cloned()
    }

    /// Element of an array, sharing its containers with `self`.
    pub fn at(&self, index: usize) -> Option<PlainValue> {
        self.as_array()?.borrow().get(index).cloned()
    }

    pub fn is_container(&self) -> bool {
        matches!(self, PlainValue::Array(_) | PlainValue::Object(_))
    }

    /// True when both values are the same container allocation.
    pub fn ptr_eq(&self, other: &PlainValue) -> bool {
        match (self.container_id(), other.container_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub(crate) fn container_id(&self) -> Option<*const ()> {
        match self {
            PlainValue::Array(items) => Some(Rc::as_ptr(items) as *const ()),
            PlainValue::Object(entries) => Some(Rc::as_ptr(entries) as *const ()),
            _ => None,
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => PlainValue::Null,
            Value::Bool(b) => PlainValue::Bool(*b),
            Value::Number(n) => PlainValue::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => PlainValue::String(s.clone()),
            Value::Array(items) => PlainValue::array(items.iter().map(PlainValue::from_json)),
            Value::Object(entries) => PlainValue::object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), PlainValue::from_json(v))),
            ),
        }
    }

    /// Converts into a JSON tree.
    ///
    /// Fails on cycles, on nesting deeper than `options.max_depth`, and on
    /// non-finite numbers unless the policy is lenient.
    pub fn to_json(&self, options: &CloneOptions) -> Result<Value> {
        let mut walk = Walk::new(options.max_depth);
        self.to_json_inner(&mut walk, options.policy)
    }

    fn to_json_inner(&self, walk: &mut Walk, policy: ClonePolicy) -> Result<Value> {
        match self {
            PlainValue::Null => Ok(Value::Null),
            PlainValue::Bool(b) => Ok(Value::Bool(*b)),
            PlainValue::Number(n) => Ok(walk
                .number(*n, policy)?
                .map(number_to_json)
                .unwrap_or(Value::Null)),
            PlainValue::String(s) => Ok(Value::String(s.clone())),
            PlainValue::Array(items) => {
                let items = walk.enter(items)?;
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    walk.push_index(index);
                    out.push(item.to_json_inner(walk, policy)?);
                    walk.pop_segment();
                }
                walk.leave();
                Ok(Value::Array(out))
            }
            PlainValue::Object(entries) => {
                let entries = walk.enter(entries)?;
                let mut out = Map::new();
                for (key, item) in entries.iter() {
                    walk.push_key(key);
                    out.insert(key.clone(), item.to_json_inner(walk, policy)?);
                    walk.pop_segment();
                }
                walk.leave();
                Ok(Value::Object(out))
            }
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

impl From<bool> for PlainValue {
    fn from(b: bool) -> Self {
        PlainValue::Bool(b)
    }
}

impl From<f64> for PlainValue {
    fn from(n: f64) -> Self {
        PlainValue::Number(n)
    }
}

impl From<i32> for PlainValue {
    fn from(n: i32) -> Self {
        PlainValue::Number(f64::from(n))
    }
}

impl From<&str> for PlainValue {
    fn from(s: &str) -> Self {
        PlainValue::String(s.to_string())
    }
}

impl From<String> for PlainValue {
    fn from(s: String) -> Self {
        PlainValue::String(s)
    }
}

impl From<Value> for PlainValue {
    fn from(value: Value) -> Self {
        PlainValue::from_json(&value)
    }
}

/// Keys that read unambiguously after a `.` in a path.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']', '"', ' '])
}

enum Segment {
    Index(usize),
    Key(String),
}

/// Traversal state shared by every walk over a [`PlainValue`] graph.
///
/// Tracks the containers currently being visited, so a container met again
/// while it is still open is a cycle. Containers reached twice along
/// different branches are fine.
pub(crate) struct Walk {
    open: Vec<*const ()>,
    path: Vec<Segment>,
    max_depth: usize,
}

impl Walk {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            open: Vec::new(),
            path: Vec::new(),
            max_depth,
        }
    }

    /// Opens a container and borrows its contents for the duration of the visit.
    pub(crate) fn enter<'a, T>(&mut self, container: &'a Shared<T>) -> Result<Ref<'a, T>> {
        let id = Rc::as_ptr(container) as *const ();
        if self.open.contains(&id) {
            return Err(self.error("cyclic structure: container contains itself"));
        }
        if self.open.len() >= self.max_depth {
            return Err(self.error(format!(
                "nesting exceeds maximum depth of {}",
                self.max_depth
            )));
        }
        let contents = container
            .try_borrow()
            .map_err(|_| self.error("container is mutably borrowed"))?;
        self.open.push(id);
        Ok(contents)
    }

    pub(crate) fn leave(&mut self) {
        self.open.pop();
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.path.push(Segment::Index(index));
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.path.push(Segment::Key(key.to_string()));
    }

    pub(crate) fn pop_segment(&mut self) {
        self.path.pop();
    }

    /// Applies the policy to a number: `Some` to keep it, `None` to write null.
    pub(crate) fn number(&self, n: f64, policy: ClonePolicy) -> Result<Option<f64>> {
        if n.is_finite() {
            return Ok(Some(n));
        }
        match policy {
            ClonePolicy::Strict => Err(self.error(format!("{} is not a finite number", n))),
            ClonePolicy::Lenient => {
                tracing::warn!(path = %self.path(), "replacing {} with null", n);
                Ok(None)
            }
        }
    }

    pub(crate) fn path(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                Segment::Index(index) => out.push_str(&format!("[{}]", index)),
                Segment::Key(key) if is_plain_key(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                Segment::Key(key) => {
                    out.push('[');
                    out.push_str(&Value::String(key.clone()).to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> UtilsError {
        UtilsError::serialization(self.path(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_and_back() {
        let source = json!({"a": [1, 2.5, {"b": "x"}], "flag": true, "none": null});
        let value = PlainValue::from_json(&source);

        assert_eq!(value.get("flag"), Some(PlainValue::Bool(true)));
        assert_eq!(value.to_json(&CloneOptions::default()).unwrap(), source);
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        let value = PlainValue::array([PlainValue::from(3.0), PlainValue::from(-0.0)]);
        let json = value.to_json(&CloneOptions::default()).unwrap();
        assert_eq!(json.to_string(), "[3,0]");
    }

    #[test]
    fn test_to_json_rejects_cycle_with_path() {
        let inner = PlainValue::array([]);
        let outer = PlainValue::object([("list", inner.clone())]);
        inner.as_array().unwrap().borrow_mut().push(outer.clone());

        let err = outer.to_json(&CloneOptions::default()).unwrap_err();
        match err {
            UtilsError::SerializationError { path, reason } => {
                assert_eq!(path, "$.list[0]");
                assert!(reason.contains("cyclic"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Break the cycle so the Rc graph can be dropped.
        inner.as_array().unwrap().borrow_mut().clear();
    }

    #[test]
    fn test_path_quotes_keys_with_separators() {
        let value = PlainValue::object([(
            "a.b[0]",
            PlainValue::array([PlainValue::from(f64::NAN)]),
        )]);

        match value.to_json(&CloneOptions::default()).unwrap_err() {
            UtilsError::SerializationError { path, .. } => assert_eq!(path, r#"$["a.b[0]"][0]"#),
            other => panic!("unexpected error: {:?}", other),
        }

        let value = PlainValue::object([("", PlainValue::from(f64::INFINITY))]);
        match value.to_json(&CloneOptions::default()).unwrap_err() {
            UtilsError::SerializationError { path, .. } => assert_eq!(path, r#"$[""]"#),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_keys_use_dot_notation() {
        let value = PlainValue::object([(
            "outer",
            PlainValue::object([("inner_key", PlainValue::from(f64::NAN))]),
        )]);

        let err = value.to_json(&CloneOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("Serialization error at $.outer.inner_key:"));
    }

    #[test]
    fn test_accessors() {
        let value = PlainValue::from(json!({"n": 2.5, "s": "text", "l": []}));

        assert!(value.is_container());
        assert!(value.get("l").unwrap().is_container());
        assert!(!value.get("n").unwrap().is_container());
        assert_eq!(value.get("n").unwrap().as_f64(), Some(2.5));
        assert_eq!(value.get("s").unwrap().as_str(), Some("text"));
        assert_eq!(value.get("s").unwrap().as_f64(), None);
        assert_eq!(value.get("n").unwrap().as_str(), None);
        assert!(value.get("missing").is_none());
        assert!(value.at(0).is_none());
    }

    #[test]
    fn test_to_json_non_finite_by_policy() {
        let value = PlainValue::object([("x", PlainValue::from(f64::INFINITY))]);

        assert!(value.to_json(&CloneOptions::default()).is_err());
        assert_eq!(
            value.to_json(&CloneOptions::lenient()).unwrap(),
            json!({"x": null})
        );
    }

    #[test]
    fn test_ptr_eq() {
        let list = PlainValue::array([PlainValue::from(1)]);
        let alias = list.clone();
        let copy = PlainValue::array([PlainValue::from(1)]);

        assert!(list.ptr_eq(&alias));
        assert!(!list.ptr_eq(&copy));
        assert_eq!(list, copy);
        assert!(!PlainValue::Null.ptr_eq(&PlainValue::Null));
    }

    #[test]
    fn test_mutably_borrowed_container_is_reported() {
        let list = PlainValue::array([PlainValue::from(1)]);
        let _guard = list.as_array().unwrap().borrow_mut();

        let err = list.to_json(&CloneOptions::default()).unwrap_err();
        assert!(err.to_string().contains("mutably borrowed"));
    }
}
