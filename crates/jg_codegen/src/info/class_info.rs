use alloc::string::String;
use alloc::vec::Vec;

use super::{Annotation, Annotations, FieldInfo, MethodInfo, TypeRef};

// -----------------------------------------------------------------------------
// EnumConstant

/// One constant of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    name: String,
    annotations: Annotations,
}

impl EnumConstant {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Annotations::new(),
        }
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

    /// The wire literal: the explicit property name if present, else the
    /// constant name.
    #[inline]
    pub fn literal(&self) -> &str {
        self.annotations.explicit_name().unwrap_or(self.name.as_str())
    }
}

// -----------------------------------------------------------------------------
// ClassKind

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    Bean,
    Enum(Vec<EnumConstant>),
}

// -----------------------------------------------------------------------------
// ClassInfo

/// The declaration of a host type.
///
/// # Examples
///
/// ```
/// use jg_codegen::info::{ClassInfo, FieldInfo, TypeRef};
///
/// let tag = ClassInfo::bean("example.Tag")
///     .with_field(FieldInfo::new("value", TypeRef::string()));
///
/// assert_eq!(tag.simple_name(), "Tag");
/// assert!(tag.constructors().is_empty());
/// assert!(tag.has_default_constructor());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    path: String,
    type_params: Vec<String>,
    kind: ClassKind,
    superclass: Option<TypeRef>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    constructors: Vec<MethodInfo>,
    annotations: Annotations,
}

impl ClassInfo {
    fn with_kind(path: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            path: path.into(),
            type_params: Vec::new(),
            kind,
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    #[inline]
    pub fn bean(path: impl Into<String>) -> Self {
        Self::with_kind(path, ClassKind::Bean)
    }

    #[inline]
    pub fn enumeration(path: impl Into<String>, constants: Vec<EnumConstant>) -> Self {
        Self::with_kind(path, ClassKind::Enum(constants))
    }

    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|param| String::from(*param)).collect();
        self
    }

    #[inline]
    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[inline]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: MethodInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[inline]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(self.path.as_str())
    }

    #[inline]
    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    #[inline]
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ClassKind::Enum(_))
    }

    #[inline]
    pub fn superclass(&self) -> Option<&TypeRef> {
        self.superclass.as_ref()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    #[inline]
    pub fn constructors(&self) -> &[MethodInfo] {
        &self.constructors
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Pairs the declared type parameters with the arguments of `ty`.
    pub fn bindings(&self, ty: &TypeRef) -> Vec<(String, TypeRef)> {
        self.type_params
            .iter()
            .cloned()
            .zip(ty.args().iter().cloned())
            .collect()
    }

    /// A class without declared constructors has an implicit one.
    pub fn has_default_constructor(&self) -> bool {
        self.constructors.is_empty()
            || self
                .constructors
                .iter()
                .any(|ctor| ctor.params().is_empty() && ctor.visibility().is_accessible())
    }
}
