use alloc::string::String;
use alloc::vec::Vec;

use crate::{AccessError, Value};

// -----------------------------------------------------------------------------
// CreatorRef

/// How a creator is declared on its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorKind {
    /// The zero-argument constructor a type without declared constructors has.
    Implicit,
    /// A declared constructor, indexed among the type's constructors.
    Constructor,
    /// A static factory method, indexed among the type's methods.
    Factory,
}

/// A reference to the constructor or factory that creates instances of a
/// type during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreatorRef {
    pub kind: CreatorKind,
    pub name: String,
    pub index: usize,
}

impl CreatorRef {
    /// The implicit default constructor.
    pub fn implicit() -> Self {
        Self {
            kind: CreatorKind::Implicit,
            name: String::from("<init>"),
            index: 0,
        }
    }

    pub fn constructor(index: usize) -> Self {
        Self {
            kind: CreatorKind::Constructor,
            name: String::from("<init>"),
            index,
        }
    }

    pub fn factory(name: impl Into<String>, index: usize) -> Self {
        Self {
            kind: CreatorKind::Factory,
            name: name.into(),
            index,
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectModel

/// Host access to object members, as used by generated codecs.
///
/// Every operation names the member exactly as the type declares it; mapping
/// members onto storage is the model's business.
pub trait ObjectModel {
    fn read_field(&self, target: &Value, field: &str) -> Result<Value, AccessError>;

    fn invoke_getter(&self, target: &Value, method: &str) -> Result<Value, AccessError>;

    fn write_field(&self, target: &mut Value, field: &str, value: Value) -> Result<(), AccessError>;

    fn invoke_setter(&self, target: &mut Value, method: &str, value: Value)
    -> Result<(), AccessError>;

    /// Creates an instance of `type_name` through `creator`, passing `args` in
    /// parameter order.
    fn construct(
        &self,
        type_name: &str,
        creator: &CreatorRef,
        args: Vec<Value>,
    ) -> Result<Value, AccessError>;
}
