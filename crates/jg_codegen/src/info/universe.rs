use alloc::string::String;

use jg_utils::hash::{HashMap, HashSet};

use super::{Annotations, ClassInfo, TypeRef};

// -----------------------------------------------------------------------------
// TypeUniverse

/// The set of host types visible to the engine.
///
/// Besides declarations, the universe carries two side channels filled by
/// the host:
///
/// - extra annotations attached to a type outside its declaration, merged
///   with the declared ones;
/// - types whose codecs are supplied externally, which the engine refers to
///   by injection instead of generating.
///
/// # Examples
///
/// ```
/// use jg_codegen::info::{Annotation, Annotations, ClassInfo, TypeUniverse};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(ClassInfo::bean("example.Tag"));
/// universe.attach_annotations(
///     "example.Tag",
///     Annotations::new().with(Annotation::IgnoreUnknown(true)),
/// );
///
/// assert!(universe.contains("example.Tag"));
/// assert_eq!(universe.class_annotation("example.Tag", |a| a.ignore_unknown()), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct TypeUniverse {
    classes: HashMap<String, ClassInfo>,
    attached: HashMap<String, Annotations>,
    external: HashSet<String>,
}

impl TypeUniverse {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration, returning the one it replaced.
    pub fn insert(&mut self, class: ClassInfo) -> Option<ClassInfo> {
        self.classes.insert(String::from(class.path()), class)
    }

    #[inline]
    pub fn get(&self, path: &str) -> Option<&ClassInfo> {
        self.classes.get(path)
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.classes.contains_key(path)
    }

    /// The declaration a named type reference points at.
    #[inline]
    pub fn resolve(&self, ty: &TypeRef) -> Option<&ClassInfo> {
        ty.path().and_then(|path| self.classes.get(path))
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    /// Attaches annotations to `path` from outside its declaration.
    pub fn attach_annotations(&mut self, path: impl Into<String>, annotations: Annotations) {
        self.attached
            .entry(path.into())
            .or_default()
            .extend(&annotations);
    }

    #[inline]
    pub fn attached_annotations(&self, path: &str) -> Option<&Annotations> {
        self.attached.get(path)
    }

    /// Queries the declared annotations of `path`, then the attached ones,
    /// and returns the first answer.
    pub fn class_annotation<T>(
        &self,
        path: &str,
        query: impl Fn(&Annotations) -> Option<T>,
    ) -> Option<T> {
        self.get(path)
            .and_then(|class| query(class.annotations()))
            .or_else(|| self.attached.get(path).and_then(&query))
    }

    /// Whether `path` is marked standalone by either annotation source.
    pub fn is_standalone(&self, path: &str) -> bool {
        self.class_annotation(path, |a| a.is_standalone().then_some(()))
            .is_some()
    }

    /// Declares that the codec of `path` is supplied by the host.
    #[inline]
    pub fn mark_external(&mut self, path: impl Into<String>) {
        self.external.insert(path.into());
    }

    #[inline]
    pub fn is_external(&self, path: &str) -> bool {
        self.external.contains(path)
    }
}
