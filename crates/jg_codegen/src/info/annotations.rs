use alloc::string::String;
use alloc::vec::Vec;
use core::slice::Iter;

// -----------------------------------------------------------------------------
// CreatorMode

/// How a marked creator binds its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreatorMode {
    /// Delegating when the creator has exactly one unnamed parameter,
    /// property-based otherwise.
    #[default]
    Default,
    /// The single parameter receives the whole decoded value.
    Delegating,
    /// Every parameter is bound to a named property.
    Properties,
    /// The creator is ignored.
    Disabled,
}

// -----------------------------------------------------------------------------
// Annotation

/// One piece of serialization metadata attached to a type or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Marks the member as a property, optionally overriding its wire name.
    ///
    /// On an enum constant, the name overrides the constant's wire literal.
    Property(Option<String>),
    /// Alternate wire names accepted when decoding.
    Alias(Vec<String>),
    /// Excludes the member, and the property it contributes to.
    Ignore,
    Nullable,
    NonNull,
    /// Flattens the property's own properties into the parent object.
    Unwrapped,
    /// Allows the property's type to refer back to an enclosing type.
    Recursive,
    /// Overrides the required flag derived from creator binding.
    Required(bool),
    /// Marks a constructor or static method as the creator.
    Creator(CreatorMode),
    /// Whether decoding tolerates unknown fields, on a type.
    IgnoreUnknown(bool),
    /// Gives the type its own codec, referenced by injection.
    Standalone,
}

// -----------------------------------------------------------------------------
// Annotations

/// An ordered collection of [`Annotation`]s.
///
/// Queries return the first matching entry.
///
/// # Examples
///
/// ```
/// use jg_codegen::info::{Annotation, Annotations};
///
/// let annotations = Annotations::new()
///     .with(Annotation::Property(Some("url".into())))
///     .with(Annotation::Alias(vec!["link".into()]));
///
/// assert_eq!(annotations.property_name(), Some(Some("url")));
/// assert_eq!(annotations.aliases().collect::<Vec<_>>(), ["link"]);
/// assert!(!annotations.is_ignored());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: Vec<Annotation>,
}

impl Annotations {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.entries.push(annotation);
        self
    }

    #[inline]
    pub fn push(&mut self, annotation: Annotation) {
        self.entries.push(annotation);
    }

    #[inline]
    pub fn extend(&mut self, other: &Annotations) {
        self.entries.extend(other.entries.iter().cloned());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Annotation> {
        self.entries.iter()
    }

    /// `None` when no property marker is present, `Some(None)` for a marker
    /// without a name.
    pub fn property_name(&self) -> Option<Option<&str>> {
        self.entries.iter().find_map(|entry| match entry {
            Annotation::Property(name) => Some(name.as_deref()),
            _ => None,
        })
    }

    /// The explicit wire name, if a property marker carries one.
    #[inline]
    pub fn explicit_name(&self) -> Option<&str> {
        self.property_name().flatten()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Annotation::Alias(names) => Some(names),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.entries.contains(&Annotation::Ignore)
    }

    /// `Some(true)` for nullable, `Some(false)` for non-null.
    pub fn nullability(&self) -> Option<bool> {
        self.entries.iter().find_map(|entry| match entry {
            Annotation::Nullable => Some(true),
            Annotation::NonNull => Some(false),
            _ => None,
        })
    }

    #[inline]
    pub fn is_unwrapped(&self) -> bool {
        self.entries.contains(&Annotation::Unwrapped)
    }

    #[inline]
    pub fn is_recursive(&self) -> bool {
        self.entries.contains(&Annotation::Recursive)
    }

    pub fn required(&self) -> Option<bool> {
        self.entries.iter().find_map(|entry| match entry {
            Annotation::Required(required) => Some(*required),
            _ => None,
        })
    }

    pub fn creator_mode(&self) -> Option<CreatorMode> {
        self.entries.iter().find_map(|entry| match entry {
            Annotation::Creator(mode) => Some(*mode),
            _ => None,
        })
    }

    pub fn ignore_unknown(&self) -> Option<bool> {
        self.entries.iter().find_map(|entry| match entry {
            Annotation::IgnoreUnknown(ignore) => Some(*ignore),
            _ => None,
        })
    }

    #[inline]
    pub fn is_standalone(&self) -> bool {
        self.entries.contains(&Annotation::Standalone)
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = Iter<'a, Annotation>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
