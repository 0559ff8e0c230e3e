use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::AccessError;

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed host value.
///
/// Generated codecs read and produce values of this shape when executed
/// through an [`ObjectModel`](crate::ObjectModel).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// An enum constant, by constant name.
    Enum(String),
    Array(Vec<Value>),
    Object(Instance),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Creates an enum constant value.
    #[inline]
    pub fn constant(name: impl Into<String>) -> Self {
        Value::Enum(name.into())
    }

    pub fn as_object(&self) -> Result<&Instance, AccessError> {
        match self {
            Value::Object(instance) => Ok(instance),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }

    pub fn as_object_mut(&mut self) -> Result<&mut Instance, AccessError> {
        match self {
            Value::Object(instance) => Ok(instance),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name(),
            }),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Instance> for Value {
    #[inline]
    fn from(value: Instance) -> Self {
        Value::Object(value)
    }
}

// -----------------------------------------------------------------------------
// Instance

/// An object instance: a type name and named storage slots.
///
/// Slots are kept in a [`BTreeMap`] so that two instances compare equal
/// field by field regardless of the order the slots were written in.
///
/// # Examples
///
/// ```
/// use jg_runtime::{Instance, Value};
///
/// let tag = Instance::new("example.Tag").with("value", "gif");
/// assert_eq!(tag.get("value"), Some(&Value::from("gif")));
/// assert_eq!(tag.type_name(), "example.Tag");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_name: String,
    slots: BTreeMap<String, Value>,
}

impl Instance {
    #[inline]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Builder form of [`Instance::set`].
    #[inline]
    pub fn with(mut self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(slot, value);
        self
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    /// Writes a slot, returning the previous value.
    #[inline]
    pub fn set(&mut self, slot: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.slots.insert(slot.into(), value.into())
    }

    /// Reads a slot, failing if it was never written.
    pub fn slot(&self, slot: &str) -> Result<&Value, AccessError> {
        self.slots.get(slot).ok_or_else(|| AccessError::MissingSlot {
            type_name: self.type_name.clone(),
            slot: String::from(slot),
        })
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }
}
