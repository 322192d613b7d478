//! Host-side views of objects
//!
//! [`NativeObject`] is a live proxy over an [`ObjectRef`] for host code that
//! wants plain values without running a driver. Reads see data slots as they
//! are now; accessors are never invoked, so an accessor slot reads as
//! `undefined`. Writes go straight to the slot and skip attribute checks.

use std::fmt;

use serde::Serialize;

use super::object::ObjectRef;
use super::value::{PropertyKey, Symbol, Value};

/// A language value as the host sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NativeValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A symbol, by description
    Symbol(Option<String>),
    #[serde(serialize_with = "serialize_object")]
    Object(NativeObject),
}

impl NativeValue {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Undefined => NativeValue::Undefined,
            Value::Null => NativeValue::Null,
            Value::Boolean(b) => NativeValue::Bool(*b),
            Value::Number(n) => NativeValue::Number(*n),
            Value::String(s) => NativeValue::String(s.clone()),
            Value::Symbol(sym) => NativeValue::Symbol(sym.description().map(str::to_string)),
            Value::Object(obj) => NativeValue::Object(obj.to_native()),
        }
    }

    /// Back into a language value. Symbols come back as fresh symbols.
    pub fn into_value(self) -> Value {
        match self {
            NativeValue::Undefined => Value::Undefined,
            NativeValue::Null => Value::Null,
            NativeValue::Bool(b) => Value::Boolean(b),
            NativeValue::Number(n) => Value::Number(n),
            NativeValue::String(s) => Value::String(s),
            NativeValue::Symbol(desc) => Value::Symbol(Symbol::new(desc.as_deref())),
            NativeValue::Object(obj) => Value::Object(obj.object),
        }
    }
}

impl From<&Value> for NativeValue {
    fn from(value: &Value) -> Self {
        NativeValue::from_value(value)
    }
}

fn serialize_object<S: serde::Serializer>(obj: &NativeObject, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("[object {}]", obj.object.class_name()))
}

/// Live host view of an object
#[derive(Clone, PartialEq)]
pub struct NativeObject {
    object: ObjectRef,
}

impl NativeObject {
    pub(crate) fn new(object: ObjectRef) -> Self {
        Self { object }
    }

    /// The object behind the view
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// Current value of `key`, own or inherited. Accessors and absent keys
    /// read as `undefined`.
    pub fn get(&self, key: impl Into<PropertyKey>) -> NativeValue {
        let value = self
            .object
            .lookup(&key.into())
            .and_then(|(_, desc)| desc.value().cloned())
            .unwrap_or_default();
        NativeValue::from_value(&value)
    }

    /// Store `value` in the own slot for `key`, creating it if the object is
    /// extensible. Returns whether a slot was written.
    pub fn set(&self, key: impl Into<PropertyKey>, value: NativeValue) -> bool {
        self.object.overwrite_data(key.into(), value.into_value())
    }

    /// Enumerable own keys, in insertion order
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.object
            .own_keys()
            .into_iter()
            .filter(|key| self.object.get_own(key).is_some_and(|desc| desc.enumerable()))
            .collect()
    }

    pub fn is_function(&self) -> bool {
        self.object.is_callable()
    }

    pub fn class_name(&self) -> &'static str {
        self.object.class_name()
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObject")
            .field("class", &self.object.class_name())
            .field("keys", &self.keys())
            .finish()
    }
}
