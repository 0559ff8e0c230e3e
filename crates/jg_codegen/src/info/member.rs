use alloc::string::String;
use alloc::vec::Vec;

use super::{Annotation, Annotations, Primitive, TypeRef};

// -----------------------------------------------------------------------------
// Visibility

/// Member visibility as seen from generated code.
///
/// Generated codecs live next to the type, so anything but `Private` is
/// reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Package,
    Private,
}

impl Visibility {
    #[inline]
    pub const fn is_accessible(self) -> bool {
        !matches!(self, Visibility::Private)
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    name: String,
    ty: TypeRef,
    visibility: Visibility,
    immutable: bool,
    is_static: bool,
    annotations: Annotations,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            immutable: false,
            is_static: false,
            annotations: Annotations::new(),
        }
    }

    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[inline]
    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    /// Marks the field as assignable only during construction.
    #[inline]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    #[inline]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[inline]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

// -----------------------------------------------------------------------------
// ParamInfo

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    name: String,
    ty: TypeRef,
    slot: Option<String>,
    annotations: Annotations,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            slot: None,
            annotations: Annotations::new(),
        }
    }

    /// Names the instance slot a creator stores this argument in.
    ///
    /// Without a binding the parameter name is used.
    #[inline]
    pub fn bind_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    #[inline]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn slot(&self) -> &str {
        self.slot.as_deref().unwrap_or(self.name.as_str())
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Instance,
    Static,
    Constructor,
}

/// A declared method or constructor.
///
/// Accessor methods may name the instance slot they read or write with
/// [`MethodInfo::bind_slot`], which is how a
/// [`DescriptorModel`](crate::exec::DescriptorModel) executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    name: String,
    kind: MethodKind,
    params: Vec<ParamInfo>,
    returns: TypeRef,
    visibility: Visibility,
    slot: Option<String>,
    annotations: Annotations,
}

impl MethodInfo {
    pub fn new(
        name: impl Into<String>,
        kind: MethodKind,
        params: Vec<ParamInfo>,
        returns: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            params,
            returns,
            visibility: Visibility::Public,
            slot: None,
            annotations: Annotations::new(),
        }
    }

    /// A public instance method without parameters.
    #[inline]
    pub fn getter(name: impl Into<String>, returns: TypeRef) -> Self {
        Self::new(name, MethodKind::Instance, Vec::new(), returns)
    }

    /// A public instance method taking one `value` parameter.
    #[inline]
    pub fn setter(name: impl Into<String>, param: TypeRef) -> Self {
        Self::new(
            name,
            MethodKind::Instance,
            alloc::vec![ParamInfo::new("value", param)],
            TypeRef::primitive(Primitive::Void),
        )
    }

    #[inline]
    pub fn constructor(params: Vec<ParamInfo>) -> Self {
        Self::new(
            "<init>",
            MethodKind::Constructor,
            params,
            TypeRef::primitive(Primitive::Void),
        )
    }

    #[inline]
    pub fn factory(name: impl Into<String>, params: Vec<ParamInfo>, returns: TypeRef) -> Self {
        Self::new(name, MethodKind::Static, params, returns)
    }

    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[inline]
    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    #[inline]
    pub fn bind_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    #[inline]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    #[inline]
    pub fn returns(&self) -> &TypeRef {
        &self.returns
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.returns == TypeRef::primitive(Primitive::Void)
    }

    /// Two methods with the same name and arity; an override replaces the
    /// inherited declaration.
    #[inline]
    pub fn overrides(&self, other: &MethodInfo) -> bool {
        self.kind == other.kind && self.name == other.name && self.params.len() == other.params.len()
    }
}
