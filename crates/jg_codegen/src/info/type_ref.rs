use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Well-known paths

/// Paths of the host types the engine gives special treatment.
pub mod known {
    pub const STRING: &str = "String";
    pub const ITERABLE: &str = "Iterable";
    pub const COLLECTION: &str = "Collection";
    pub const LIST: &str = "List";
    pub const ARRAY_LIST: &str = "ArrayList";

    /// Collection shapes encoded as token arrays.
    pub const COLLECTIONS: [&str; 4] = [ITERABLE, COLLECTION, LIST, ARRAY_LIST];

    #[inline]
    pub fn is_collection(path: &str) -> bool {
        COLLECTIONS.contains(&path)
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A host primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Primitive::Byte | Primitive::Short | Primitive::Char | Primitive::Int | Primitive::Long
        )
    }

    #[inline]
    pub const fn is_floating(self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }

    /// Inclusive value range of an integral primitive.
    pub const fn range(self) -> Option<(i64, i64)> {
        match self {
            Primitive::Byte => Some((i8::MIN as i64, i8::MAX as i64)),
            Primitive::Short => Some((i16::MIN as i64, i16::MAX as i64)),
            Primitive::Char => Some((0, u16::MAX as i64)),
            Primitive::Int => Some((i32::MIN as i64, i32::MAX as i64)),
            Primitive::Long => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A reference to a host type, as it appears on a member.
///
/// Equality is structural: two references are equal when their paths and
/// all generic arguments are equal.
///
/// # Examples
///
/// ```
/// use jg_codegen::info::TypeRef;
///
/// let tags = TypeRef::list_of(TypeRef::named("example.Tag"));
/// assert_eq!(tags.to_string(), "List<example.Tag>");
/// assert_ne!(tags, TypeRef::list_of(TypeRef::string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Array(Box<TypeRef>),
    Named { path: String, args: Vec<TypeRef> },
    /// A generic type parameter not bound at this position.
    Param(String),
}

impl TypeRef {
    #[inline]
    pub const fn primitive(primitive: Primitive) -> Self {
        TypeRef::Primitive(primitive)
    }

    #[inline]
    pub fn named(path: impl Into<String>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args: Vec::new(),
        }
    }

    #[inline]
    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args,
        }
    }

    #[inline]
    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    #[inline]
    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(name.into())
    }

    #[inline]
    pub fn string() -> Self {
        TypeRef::named(known::STRING)
    }

    #[inline]
    pub fn list_of(element: TypeRef) -> Self {
        TypeRef::generic(known::LIST, alloc::vec![element])
    }

    #[inline]
    pub const fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeRef::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }

    #[inline]
    pub fn path(&self) -> Option<&str> {
        match self {
            TypeRef::Named { path, .. } => Some(path),
            _ => None,
        }
    }

    #[inline]
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Last segment of the path, or the display form for other shapes.
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Named { path, .. } => String::from(path.rsplit('.').next().unwrap_or(path.as_str())),
            TypeRef::Primitive(primitive) => String::from(primitive.name()),
            TypeRef::Array(element) => {
                let mut name = element.simple_name();
                name.push_str("Array");
                name
            }
            TypeRef::Param(name) => name.clone(),
        }
    }

    /// Replaces bound type parameters.
    ///
    /// ```
    /// use jg_codegen::info::TypeRef;
    ///
    /// let field = TypeRef::list_of(TypeRef::param("E"));
    /// let bound = field.substitute(&[("E".into(), TypeRef::string())]);
    /// assert_eq!(bound, TypeRef::list_of(TypeRef::string()));
    /// ```
    pub fn substitute(&self, bindings: &[(String, TypeRef)]) -> TypeRef {
        match self {
            TypeRef::Param(name) => bindings
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, bound)| bound.clone())
                .unwrap_or_else(|| self.clone()),
            TypeRef::Array(element) => TypeRef::array_of(element.substitute(bindings)),
            TypeRef::Named { path, args } => TypeRef::Named {
                path: path.clone(),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect(),
            },
            TypeRef::Primitive(_) => self.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(primitive) => f.write_str(primitive.name()),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Param(name) => f.write_str(name),
            TypeRef::Named { path, args } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
