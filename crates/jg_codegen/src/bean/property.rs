use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::info::TypeRef;

// -----------------------------------------------------------------------------
// Direction

/// Which side of a codec a definition is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Serialize,
    Deserialize,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Serialize, Direction::Deserialize];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Serialize => "serialization",
            Direction::Deserialize => "deserialization",
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyFlags

bitflags! {
    /// Modifiers resolved for a [`Property`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const NULLABLE = 1 << 0;
        const UNWRAPPED = 1 << 1;
        const RECURSIVE = 1 << 2;
        const REQUIRED = 1 << 3;
    }
}

// -----------------------------------------------------------------------------
// Access

/// How generated code reads a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadAccess {
    Getter(String),
    Field(String),
}

/// How generated code writes a property after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WriteAccess {
    Setter(String),
    Field(String),
}

// -----------------------------------------------------------------------------
// Property

/// One serializable member of a bean, for one [`Direction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) field: Option<String>,
    pub(crate) getter: Option<String>,
    pub(crate) setter: Option<String>,
    pub(crate) creator_param: Option<usize>,
    pub(crate) aliases: Vec<String>,
    pub(crate) flags: PropertyFlags,
    pub(crate) element: String,
}

impl Property {
    /// The canonical wire name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    #[inline]
    pub fn getter(&self) -> Option<&str> {
        self.getter.as_deref()
    }

    #[inline]
    pub fn setter(&self) -> Option<&str> {
        self.setter.as_deref()
    }

    /// Index of the creator parameter this property is bound to.
    #[inline]
    pub fn creator_param(&self) -> Option<usize> {
        self.creator_param
    }

    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(PropertyFlags::NULLABLE)
    }

    #[inline]
    pub fn is_unwrapped(&self) -> bool {
        self.flags.contains(PropertyFlags::UNWRAPPED)
    }

    #[inline]
    pub fn permits_recursion(&self) -> bool {
        self.flags.contains(PropertyFlags::RECURSIVE)
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.flags.contains(PropertyFlags::REQUIRED)
    }

    /// A readable description of the member the property came from, used
    /// to attach diagnostics.
    #[inline]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Getter first, then field.
    pub fn read_access(&self) -> Option<ReadAccess> {
        match (&self.getter, &self.field) {
            (Some(getter), _) => Some(ReadAccess::Getter(getter.clone())),
            (None, Some(field)) => Some(ReadAccess::Field(field.clone())),
            (None, None) => None,
        }
    }

    /// Setter first, then field. Creator-bound properties have neither.
    pub fn write_access(&self) -> Option<WriteAccess> {
        match (&self.setter, &self.field) {
            (Some(setter), _) => Some(WriteAccess::Setter(setter.clone())),
            (None, Some(field)) => Some(WriteAccess::Field(field.clone())),
            (None, None) => None,
        }
    }
}
