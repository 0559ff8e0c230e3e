//! The synthesized codec bodies.
//!
//! A plan is the structured form of a generated encode or decode method:
//! nested operations over named locals, with every local named once and
//! every injected codec referenced by field. [`exec`](crate::exec) runs
//! plans directly against a token stream.

// -----------------------------------------------------------------------------
// Modules

mod tracking;

// -----------------------------------------------------------------------------
// Exports

pub use tracking::TrackingMask;

// -----------------------------------------------------------------------------
// Plan

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use jg_runtime::{CreatorRef, Value};

use crate::bean::{ReadAccess, WriteAccess};
use crate::info::{Primitive, TypeRef};
use crate::registry::EnumCase;

/// A method-local variable: its slot in the frame and its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Local {
    pub index: usize,
    pub name: String,
}

/// A field of the generated codec holding another codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Injection {
    pub field: String,
    pub target: TypeRef,
    /// Resolved on first use rather than at construction.
    pub lazy: bool,
}

// -----------------------------------------------------------------------------
// Encode

/// Writes the current value.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeOp {
    Boolean,
    Number(Primitive),
    String,
    Sequence { element: Box<EncodeOp> },
    Enum {
        type_name: String,
        cases: Vec<EnumCase>,
    },
    /// Stores the value in `temp`, then writes null or the inner operation.
    Nullable { temp: Local, inner: Box<EncodeOp> },
    Injected { field: String },
    /// Stores the object in `temp` and writes its properties in order.
    Object {
        temp: Local,
        properties: Vec<EncodeProperty>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EncodeProperty {
    /// `name: value`.
    Field {
        name: String,
        read: ReadAccess,
        value: EncodeOp,
    },
    /// The nested object's properties, written into the enclosing object.
    Unwrapped {
        read: ReadAccess,
        temp: Local,
        properties: Vec<EncodeProperty>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeMethod {
    /// Local names in slot order.
    pub locals: Vec<String>,
    pub body: EncodeOp,
}

// -----------------------------------------------------------------------------
// Decode

/// Reads one value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOp {
    Boolean,
    Number(Primitive),
    String,
    Sequence { element: Box<DecodeOp> },
    Enum {
        type_name: String,
        cases: Vec<EnumCase>,
    },
    /// Accepts null, otherwise the inner operation.
    Nullable(Box<DecodeOp>),
    Injected { field: String },
    Object(Box<ObjectDecoder>),
}

/// A flattened property set read from one token object.
///
/// Unwrapped properties contribute their leaves directly, so a single
/// dispatch table covers the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecoder {
    pub type_name: String,
    pub leaves: Vec<LeafProperty>,
    /// Wire name or alias to leaf index.
    pub dispatch: BTreeMap<String, usize>,
    pub tracking: TrackingMask,
    pub ignore_unknown: bool,
    pub assembly: Assembly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafProperty {
    pub name: String,
    pub local: Local,
    /// Initial value of the local when the property is absent.
    pub zero: Value,
    pub value: DecodeOp,
}

/// Builds one object from decoded locals, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub type_name: String,
    pub creator: CreatorRef,
    /// Creator arguments in parameter order.
    pub arguments: Vec<Source>,
    /// Writes applied after construction.
    pub apply: Vec<(WriteAccess, Source)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Local(Local),
    Nested(Box<Assembly>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeMethod {
    pub locals: Vec<String>,
    pub body: DecodeOp,
}
