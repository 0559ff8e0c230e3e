use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{Primitive, TypeRef};

// -----------------------------------------------------------------------------
// EnumCase

/// One enum constant and its wire literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumCase {
    pub constant: String,
    pub literal: String,
}

// -----------------------------------------------------------------------------
// SequenceShape

/// The host shape of a token-array value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceShape {
    Array,
    List,
}

// -----------------------------------------------------------------------------
// CodecStrategy

/// The encode/decode behavior chosen for one type.
///
/// A strategy holds no synthesis state; naming and diagnostics come from the
/// [`SynthContext`](crate::synth::SynthContext) it is run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecStrategy {
    /// Numbers and booleans.
    Scalar(Primitive),
    String,
    /// Arrays and well-known collections, element by element.
    ///
    /// `recursive` carries the recursion permission of the owning property
    /// down to the element.
    Sequence {
        shape: SequenceShape,
        element: TypeRef,
        recursive: bool,
    },
    Enum { cases: Vec<EnumCase> },
    /// Delegates to a separately supplied codec, held in a field of the
    /// generated codec.
    Injected { lazy: bool },
    /// Inlines the type's bean definition.
    Bean,
    /// Writes and accepts null around another strategy.
    Nullable(Box<CodecStrategy>),
}

/// What a strategy depends on, as seen by the cycle checker and the
/// synthesizer alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge<'a> {
    /// No dependency on other types.
    Leaf,
    /// Depends on the element type.
    Element { element: &'a TypeRef, recursive: bool },
    /// Embeds the type's properties by value.
    Bean,
    /// Refers to another codec; only eager references constrain
    /// construction order.
    Injected { lazy: bool },
}

impl CodecStrategy {
    /// The strategy used for a property that permits recursion.
    ///
    /// Embedded beans become lazy injections so that a self-referential type
    /// refers to its own codec instead of expanding forever.
    pub fn recursive(self) -> Self {
        match self {
            CodecStrategy::Bean | CodecStrategy::Injected { .. } => {
                CodecStrategy::Injected { lazy: true }
            }
            CodecStrategy::Sequence { shape, element, .. } => CodecStrategy::Sequence {
                shape,
                element,
                recursive: true,
            },
            CodecStrategy::Nullable(inner) => CodecStrategy::Nullable(Box::new(inner.recursive())),
            other => other,
        }
    }

    /// Wraps the strategy to handle null; primitives are never null.
    pub fn nullable(self) -> Self {
        match self {
            CodecStrategy::Nullable(_) | CodecStrategy::Scalar(_) => self,
            other => CodecStrategy::Nullable(Box::new(other)),
        }
    }

    pub fn edge(&self) -> Edge<'_> {
        match self {
            CodecStrategy::Scalar(_) | CodecStrategy::String | CodecStrategy::Enum { .. } => {
                Edge::Leaf
            }
            CodecStrategy::Sequence {
                element, recursive, ..
            } => Edge::Element {
                element,
                recursive: *recursive,
            },
            CodecStrategy::Injected { lazy } => Edge::Injected { lazy: *lazy },
            CodecStrategy::Bean => Edge::Bean,
            CodecStrategy::Nullable(inner) => inner.edge(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{CodecStrategy, Edge, SequenceShape};
    use crate::info::{Primitive, TypeRef};
    use alloc::boxed::Box;

    #[test]
    fn recursion_turns_embedding_into_lazy_injection() {
        assert_eq!(
            CodecStrategy::Bean.recursive(),
            CodecStrategy::Injected { lazy: true }
        );
        assert_eq!(
            CodecStrategy::Bean.nullable().recursive(),
            CodecStrategy::Nullable(Box::new(CodecStrategy::Injected { lazy: true }))
        );
        assert_eq!(
            CodecStrategy::String.recursive(),
            CodecStrategy::String
        );
    }

    #[test]
    fn nullable_edges_see_through() {
        let list = CodecStrategy::Sequence {
            shape: SequenceShape::List,
            element: TypeRef::named("t.Node"),
            recursive: false,
        }
        .nullable();
        assert_eq!(
            list.edge(),
            Edge::Element {
                element: &TypeRef::named("t.Node"),
                recursive: false,
            }
        );
        assert_eq!(
            CodecStrategy::Scalar(Primitive::Int).nullable(),
            CodecStrategy::Scalar(Primitive::Int)
        );
    }
}
