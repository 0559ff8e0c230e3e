use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Diagnostics;
use crate::bean::{BeanDefinition, Direction, Introspector, Property, decapitalize};
use crate::info::{TypeRef, TypeUniverse};
use crate::plan::{Injection, Local};
use crate::registry::{CodecRegistry, CodecStrategy};
use crate::scope::NameScope;

// -----------------------------------------------------------------------------
// MethodScope

#[derive(Debug, Default)]
struct MethodScope {
    names: NameScope,
    locals: Vec<String>,
}

// -----------------------------------------------------------------------------
// SynthContext

/// Mutable state of one codec's synthesis.
///
/// Strategies hold no state of their own. Everything that must be unique
/// within the generated codec lives here: field names, method-local names,
/// the injected codecs, and the path used in diagnostics.
#[derive(Debug)]
pub struct SynthContext<'a> {
    universe: &'a TypeUniverse,
    registry: &'a CodecRegistry,
    diagnostics: Diagnostics,
    path: Vec<String>,
    fields: NameScope,
    method: Option<MethodScope>,
    injections: Vec<Injection>,
    inlining: Vec<TypeRef>,
}

impl<'a> SynthContext<'a> {
    pub fn new(
        universe: &'a TypeUniverse,
        registry: &'a CodecRegistry,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            universe,
            registry,
            diagnostics,
            path: Vec::new(),
            fields: NameScope::new(),
            method: None,
            injections: Vec::new(),
            inlining: Vec::new(),
        }
    }

    #[inline]
    pub fn universe(&self) -> &'a TypeUniverse {
        self.universe
    }

    #[inline]
    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    // -------------------------------------------------------------------------
    // Names

    /// Opens the local scope of a generated method whose parameters are
    /// `params`.
    pub fn begin_method(&mut self, params: &[&str]) {
        debug_assert!(self.method.is_none(), "methods do not nest");
        self.method = Some(MethodScope {
            names: NameScope::with_reserved(params),
            locals: Vec::new(),
        });
    }

    /// Closes the method scope, returning its local names in slot order.
    pub fn end_method(&mut self) -> Vec<String> {
        self.method
            .take()
            .map(|scope| scope.locals)
            .unwrap_or_default()
    }

    pub fn new_local(&mut self, hint: &str) -> Local {
        let scope = self.method.get_or_insert_with(MethodScope::default);
        let name = scope.names.claim(hint);
        let index = scope.locals.len();
        scope.locals.push(name.clone());
        Local { index, name }
    }

    /// The field holding the codec of `target`, requested once per target
    /// and laziness.
    pub fn request_injection(&mut self, target: &TypeRef, lazy: bool) -> String {
        if let Some(existing) = self
            .injections
            .iter()
            .find(|injection| injection.lazy == lazy && injection.target == *target)
        {
            return existing.field.clone();
        }

        let mut hint = decapitalize(&target.simple_name());
        hint.push_str(if lazy { "Provider" } else { "Codec" });
        let field = self.fields.claim(&hint);
        self.injections.push(Injection {
            field: field.clone(),
            target: target.clone(),
            lazy,
        });
        field
    }

    // -------------------------------------------------------------------------
    // Path

    pub fn enter(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    /// The current position, such as `Image->tags->value`.
    pub fn readable_path(&self) -> String {
        self.path.join("->")
    }

    // -------------------------------------------------------------------------
    // Inlining

    /// Marks `ty` as being inlined; fails if it is inlined already further
    /// up, which would expand without end.
    pub(crate) fn push_inline(&mut self, ty: &TypeRef, element: Option<&str>) -> bool {
        if self.inlining.contains(ty) {
            let message = format!(
                "`{ty}` embeds itself at {}; mark the property as recursive",
                self.readable_path(),
            );
            self.diagnostics.fail(message, element);
            return false;
        }
        self.inlining.push(ty.clone());
        true
    }

    pub(crate) fn pop_inline(&mut self) {
        self.inlining.pop();
    }

    #[inline]
    pub(crate) fn inline_mark(&self) -> usize {
        self.inlining.len()
    }

    pub(crate) fn restore_inline(&mut self, mark: usize) {
        self.inlining.truncate(mark);
    }

    // -------------------------------------------------------------------------
    // Resolution

    pub fn introspect(&mut self, ty: &TypeRef, direction: Direction) -> Option<BeanDefinition> {
        Introspector::new(self.universe).introspect(ty, direction, &mut self.diagnostics)
    }

    /// Looks up the strategy of `ty`, reporting a failure if there is none.
    pub fn resolve(&mut self, ty: &TypeRef, element: Option<&str>) -> Option<CodecStrategy> {
        match self.registry.resolve(self.universe, ty) {
            Ok(strategy) => Some(strategy),
            Err(error) => {
                let message = format!("{error} at {}", self.readable_path());
                self.diagnostics.fail(message, element);
                None
            }
        }
    }

    /// The strategy of a property, with its recursion and null handling
    /// applied.
    pub fn property_strategy(&mut self, property: &Property) -> Option<CodecStrategy> {
        let mut strategy = self.resolve(property.ty(), Some(property.element()))?;
        if property.permits_recursion() {
            strategy = strategy.recursive();
        }
        if property.is_nullable() {
            strategy = strategy.nullable();
        }
        Some(strategy)
    }

    pub fn finish(self) -> (Diagnostics, Vec<Injection>) {
        (self.diagnostics, self.injections)
    }
}

// -----------------------------------------------------------------------------
// Tests
