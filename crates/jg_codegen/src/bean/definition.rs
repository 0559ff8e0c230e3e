use alloc::vec::Vec;

use jg_runtime::CreatorRef;

use super::Property;
use crate::info::TypeRef;

// -----------------------------------------------------------------------------
// Creator

/// The creator of a bean and its parameter bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub(crate) reference: CreatorRef,
    pub(crate) params: Vec<usize>,
}

impl Creator {
    #[inline]
    pub fn reference(&self) -> &CreatorRef {
        &self.reference
    }

    /// For each creator parameter, in order, the index of its property.
    #[inline]
    pub fn params(&self) -> &[usize] {
        &self.params
    }
}

// -----------------------------------------------------------------------------
// BeanDefinition

/// The canonical property model of one type in one direction.
///
/// Built by [`Introspector`](super::Introspector). Properties keep
/// declaration order; every creator parameter maps to exactly one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition {
    pub(crate) ty: TypeRef,
    pub(crate) properties: Vec<Property>,
    pub(crate) creator: Creator,
    pub(crate) ignore_unknown: bool,
}

impl BeanDefinition {
    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name() == name)
    }

    #[inline]
    pub fn creator(&self) -> &Creator {
        &self.creator
    }

    /// Whether decoding skips unknown fields instead of failing.
    #[inline]
    pub fn ignore_unknown(&self) -> bool {
        self.ignore_unknown
    }
}
