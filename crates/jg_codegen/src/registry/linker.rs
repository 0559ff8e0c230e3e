use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use super::{CodecStrategy, EnumCase, SequenceShape};
use crate::info::{ClassKind, Primitive, TypeRef, TypeUniverse, known};

// -----------------------------------------------------------------------------
// LinkError

/// A type no strategy can handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinkError {
    #[error("no codec for type `{0}`")]
    NoCodec(TypeRef),
    #[error("raw collection type `{0}` is not supported, declare its element type")]
    RawCollection(TypeRef),
    #[error("unbound type parameter `{0}`")]
    UnboundParameter(String),
}

// -----------------------------------------------------------------------------
// StrategyKind

/// The builtin strategy families, each with a capability predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Array,
    Collection,
    Scalar,
    String,
    Enum,
    /// Codecs supplied by the host, and standalone types.
    External,
    /// Any declared bean; the catch-all.
    Bean,
}

impl StrategyKind {
    /// `None` when `ty` is not of this family.
    fn try_match(
        self,
        universe: &TypeUniverse,
        ty: &TypeRef,
    ) -> Option<Result<CodecStrategy, LinkError>> {
        match self {
            StrategyKind::Array => match ty {
                TypeRef::Array(element) => Some(Ok(CodecStrategy::Sequence {
                    shape: SequenceShape::Array,
                    element: (**element).clone(),
                    recursive: false,
                })),
                _ => None,
            },
            StrategyKind::Collection => {
                let path = ty.path()?;
                if !known::is_collection(path) {
                    return None;
                }
                Some(match ty.args() {
                    [element] => Ok(CodecStrategy::Sequence {
                        shape: SequenceShape::List,
                        element: element.clone(),
                        recursive: false,
                    }),
                    _ => Err(LinkError::RawCollection(ty.clone())),
                })
            }
            StrategyKind::Scalar => match ty.as_primitive()? {
                Primitive::Void => None,
                primitive => Some(Ok(CodecStrategy::Scalar(primitive))),
            },
            StrategyKind::String => {
                (ty.path()? == known::STRING).then_some(Ok(CodecStrategy::String))
            }
            StrategyKind::Enum => match universe.resolve(ty)?.kind() {
                ClassKind::Enum(constants) => Some(Ok(CodecStrategy::Enum {
                    cases: constants
                        .iter()
                        .map(|constant| EnumCase {
                            constant: String::from(constant.name()),
                            literal: String::from(constant.literal()),
                        })
                        .collect(),
                })),
                ClassKind::Bean => None,
            },
            StrategyKind::External => {
                let path = ty.path()?;
                (universe.is_external(path) || universe.is_standalone(path))
                    .then_some(Ok(CodecStrategy::Injected { lazy: false }))
            }
            StrategyKind::Bean => match universe.resolve(ty)?.kind() {
                ClassKind::Bean => Some(Ok(CodecStrategy::Bean)),
                ClassKind::Enum(_) => None,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// RegistryEntry

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEntry {
    /// A codec generated for exactly this type, referenced by injection.
    Generated(TypeRef),
    Builtin(StrategyKind),
}

// -----------------------------------------------------------------------------
// CodecRegistry

/// Ordered strategy dispatch.
///
/// [`CodecRegistry::resolve`] tries each entry in order and returns the first
/// match. Generated codecs are prepended, so a type that already has its own
/// codec is injected rather than inlined again.
///
/// A registry accumulates entries while codecs are generated and belongs to
/// a single [`Generator`](crate::Generator).
///
/// # Examples
///
/// ```
/// use jg_codegen::info::{ClassInfo, TypeRef, TypeUniverse};
/// use jg_codegen::registry::{CodecRegistry, CodecStrategy};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(ClassInfo::bean("example.Tag"));
/// let tag = TypeRef::named("example.Tag");
///
/// let mut registry = CodecRegistry::new();
/// assert_eq!(registry.resolve(&universe, &tag), Ok(CodecStrategy::Bean));
///
/// registry.prepend_generated(tag.clone());
/// assert_eq!(
///     registry.resolve(&universe, &tag),
///     Ok(CodecStrategy::Injected { lazy: false }),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    entries: Vec<RegistryEntry>,
}

impl CodecRegistry {
    /// Builtin families in resolution order.
    pub const BUILTIN_ORDER: [StrategyKind; 7] = [
        StrategyKind::Array,
        StrategyKind::Collection,
        StrategyKind::Scalar,
        StrategyKind::String,
        StrategyKind::Enum,
        StrategyKind::External,
        StrategyKind::Bean,
    ];

    pub fn new() -> Self {
        Self {
            entries: Self::BUILTIN_ORDER
                .into_iter()
                .map(RegistryEntry::Builtin)
                .collect(),
        }
    }

    #[inline]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    #[inline]
    pub fn is_generated(&self, ty: &TypeRef) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, RegistryEntry::Generated(generated) if generated == ty))
    }

    /// Registers the generated codec of `ty` ahead of all other entries.
    ///
    /// Returns `false` if it was registered already.
    pub fn prepend_generated(&mut self, ty: TypeRef) -> bool {
        if self.is_generated(&ty) {
            return false;
        }
        self.entries.insert(0, RegistryEntry::Generated(ty));
        true
    }

    pub fn resolve(
        &self,
        universe: &TypeUniverse,
        ty: &TypeRef,
    ) -> Result<CodecStrategy, LinkError> {
        for entry in &self.entries {
            let matched = match entry {
                RegistryEntry::Generated(generated) => {
                    (generated == ty).then_some(Ok(CodecStrategy::Injected { lazy: false }))
                }
                RegistryEntry::Builtin(kind) => kind.try_match(universe, ty),
            };
            if let Some(result) = matched {
                log::debug!("resolved `{ty}` through {entry:?}");
                return result;
            }
        }

        match ty {
            TypeRef::Param(name) => Err(LinkError::UnboundParameter(name.clone())),
            _ => Err(LinkError::NoCodec(ty.clone())),
        }
    }
}

impl Default for CodecRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{CodecRegistry, LinkError, RegistryEntry, StrategyKind};
    use crate::info::{Annotation, Annotations, ClassInfo, EnumConstant, Primitive};
    use crate::info::{TypeRef, TypeUniverse};
    use crate::registry::{CodecStrategy, EnumCase, SequenceShape};
    use alloc::string::String;
    use alloc::vec;

    fn universe() -> TypeUniverse {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("t.Tag"));
        universe.insert(ClassInfo::enumeration(
            "t.Color",
            vec![
                EnumConstant::new("RED"),
                EnumConstant::new("DARK_BLUE").annotate(Annotation::Property(Some(String::from("dark-blue")))),
            ],
        ));
        universe.insert(ClassInfo::bean("t.Shared"));
        universe.attach_annotations("t.Shared", Annotations::new().with(Annotation::Standalone));
        universe.mark_external("t.Instant");
        universe
    }

    #[test]
    fn order_is_explicit() {
        let registry = CodecRegistry::new();
        assert_eq!(registry.entries().len(), 7);
        assert_eq!(
            registry.entries()[0],
            RegistryEntry::Builtin(StrategyKind::Array)
        );
        assert_eq!(
            registry.entries()[6],
            RegistryEntry::Builtin(StrategyKind::Bean)
        );
    }

    #[test]
    fn builtin_families() {
        let universe = universe();
        let registry = CodecRegistry::new();
        let resolve = |ty: TypeRef| registry.resolve(&universe, &ty);

        assert_eq!(
            resolve(TypeRef::primitive(Primitive::Double)),
            Ok(CodecStrategy::Scalar(Primitive::Double))
        );
        assert_eq!(resolve(TypeRef::string()), Ok(CodecStrategy::String));
        assert_eq!(
            resolve(TypeRef::array_of(TypeRef::primitive(Primitive::Int))),
            Ok(CodecStrategy::Sequence {
                shape: SequenceShape::Array,
                element: TypeRef::primitive(Primitive::Int),
                recursive: false,
            })
        );
        assert_eq!(
            resolve(TypeRef::generic("ArrayList", vec![TypeRef::named("t.Tag")])),
            Ok(CodecStrategy::Sequence {
                shape: SequenceShape::List,
                element: TypeRef::named("t.Tag"),
                recursive: false,
            })
        );
        assert_eq!(
            resolve(TypeRef::named("t.Color")),
            Ok(CodecStrategy::Enum {
                cases: vec![
                    EnumCase {
                        constant: String::from("RED"),
                        literal: String::from("RED"),
                    },
                    EnumCase {
                        constant: String::from("DARK_BLUE"),
                        literal: String::from("dark-blue"),
                    },
                ],
            })
        );
        assert_eq!(resolve(TypeRef::named("t.Tag")), Ok(CodecStrategy::Bean));
        assert_eq!(
            resolve(TypeRef::named("t.Shared")),
            Ok(CodecStrategy::Injected { lazy: false })
        );
        assert_eq!(
            resolve(TypeRef::named("t.Instant")),
            Ok(CodecStrategy::Injected { lazy: false })
        );
    }

    #[test]
    fn unsupported_types() {
        let universe = universe();
        let registry = CodecRegistry::new();

        assert_eq!(
            registry.resolve(&universe, &TypeRef::named("List")),
            Err(LinkError::RawCollection(TypeRef::named("List")))
        );
        assert_eq!(
            registry.resolve(&universe, &TypeRef::param("T")),
            Err(LinkError::UnboundParameter(String::from("T")))
        );
        assert_eq!(
            registry.resolve(&universe, &TypeRef::primitive(Primitive::Void)),
            Err(LinkError::NoCodec(TypeRef::primitive(Primitive::Void)))
        );
        assert_eq!(
            registry.resolve(&universe, &TypeRef::named("t.Unknown")),
            Err(LinkError::NoCodec(TypeRef::named("t.Unknown")))
        );
    }

    #[test]
    fn generated_entries_take_priority() {
        let universe = universe();
        let mut registry = CodecRegistry::new();
        let tag = TypeRef::named("t.Tag");

        assert!(registry.prepend_generated(tag.clone()));
        assert!(!registry.prepend_generated(tag.clone()));
        assert_eq!(registry.entries()[0], RegistryEntry::Generated(tag.clone()));
        assert_eq!(
            registry.resolve(&universe, &tag),
            Ok(CodecStrategy::Injected { lazy: false })
        );
        assert_eq!(
            registry.resolve(&universe, &TypeRef::list_of(tag.clone())),
            Ok(CodecStrategy::Sequence {
                shape: SequenceShape::List,
                element: tag,
                recursive: false,
            })
        );
    }
}
