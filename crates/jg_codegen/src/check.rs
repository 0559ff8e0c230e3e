use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use jg_utils::hash::HashSet;

use crate::Diagnostics;
use crate::bean::{Direction, Introspector};
use crate::info::{ClassKind, TypeRef, TypeUniverse};
use crate::registry::{CodecRegistry, CodecStrategy, Edge};

// -----------------------------------------------------------------------------
// FrameStack

struct Frame {
    ty: TypeRef,
    property: Option<String>,
}

/// The chain of beans being visited, each with the property currently
/// followed.
///
/// Beans whose whole reachable graph was walked without a cycle are kept in
/// `proven`; a later path reaching them cannot close a cycle through them.
#[derive(Default)]
struct FrameStack {
    frames: Vec<Frame>,
    proven: HashSet<TypeRef>,
}

impl FrameStack {
    fn position(&self, ty: &TypeRef) -> Option<usize> {
        self.frames.iter().position(|frame| frame.ty == *ty)
    }

    fn push(&mut self, ty: &TypeRef) {
        self.frames.push(Frame {
            ty: ty.clone(),
            property: None,
        });
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn follow(&mut self, property: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.property = Some(String::from(property));
        }
    }

    /// `Type->prop->prop`, from the frame at `from` to the top.
    fn cycle_path(&self, from: usize) -> String {
        let mut path = self.frames[from].ty.simple_name();
        for frame in &self.frames[from..] {
            if let Some(property) = &frame.property {
                path.push_str("->");
                path.push_str(property);
            }
        }
        path
    }
}

impl fmt::Debug for FrameStack {
    /// Formats like:
    ///
    /// ```text
    /// `a.Node` .next
    ///  -> `a.Node`
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, frame) in self.frames.iter().enumerate() {
            if index > 0 {
                f.write_str("\n -> ")?;
            }
            write!(f, "`{}`", frame.ty)?;
            if let Some(property) = &frame.property {
                write!(f, " .{property}")?;
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// DependencyChecker

/// Rejects types whose codecs would embed themselves.
///
/// Walks the strategy graph from a root bean, once per direction, following
/// embedded beans, collection elements and eager injections into generated
/// beans. Lazy injections end a path, since they are resolved on first use.
/// Reaching a bean already on the current path is a cycle.
///
/// # Examples
///
/// ```
/// use jg_codegen::info::{ClassInfo, FieldInfo, TypeRef, TypeUniverse};
/// use jg_codegen::{CodecRegistry, DependencyChecker, Diagnostics};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(
///     ClassInfo::bean("a.Node").with_field(FieldInfo::new("next", TypeRef::named("a.Node"))),
/// );
/// let registry = CodecRegistry::new();
///
/// let mut diagnostics = Diagnostics::new();
/// let checker = DependencyChecker::new(&universe, &registry);
/// assert!(!checker.check(&TypeRef::named("a.Node"), &mut diagnostics));
/// assert!(diagnostics.problems()[0].message.contains("Node->next"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DependencyChecker<'a> {
    universe: &'a TypeUniverse,
    registry: &'a CodecRegistry,
}

impl<'a> DependencyChecker<'a> {
    #[inline]
    pub const fn new(universe: &'a TypeUniverse, registry: &'a CodecRegistry) -> Self {
        Self { universe, registry }
    }

    /// Checks `root` in both directions; returns `false` if a cycle was
    /// reported.
    pub fn check(&self, root: &TypeRef, diagnostics: &mut Diagnostics) -> bool {
        let mut acyclic = true;
        for direction in Direction::BOTH {
            let mut stack = FrameStack::default();
            acyclic &= self.visit_bean(root, direction, &mut stack, diagnostics);
        }
        acyclic
    }

    fn visit_bean(
        &self,
        ty: &TypeRef,
        direction: Direction,
        stack: &mut FrameStack,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        if let Some(position) = stack.position(ty) {
            log::debug!("cycle found:\n{stack:?}");
            diagnostics.fail(
                format!(
                    "circular dependency in {}: {} leads back to `{ty}`; \
                     mark a property on the path as recursive",
                    direction.as_str(),
                    stack.cycle_path(position),
                ),
                Some(&ty.to_string()),
            );
            return false;
        }
        if stack.proven.contains(ty) {
            return true;
        }

        // Problems of the definition itself are reported by synthesis.
        let mut scratch = Diagnostics::new();
        let Some(definition) =
            Introspector::new(self.universe).introspect(ty, direction, &mut scratch)
        else {
            return true;
        };

        stack.push(ty);
        let mut acyclic = true;
        for property in definition.properties() {
            stack.follow(property.name());
            acyclic &= if property.is_unwrapped() {
                self.visit_bean(property.ty(), direction, stack, diagnostics)
            } else {
                match self.registry.resolve(self.universe, property.ty()) {
                    Ok(strategy) => {
                        let strategy = if property.permits_recursion() {
                            strategy.recursive()
                        } else {
                            strategy
                        };
                        self.visit_strategy(&strategy, property.ty(), direction, stack, diagnostics)
                    }
                    Err(_) => true,
                }
            };
        }
        stack.pop();
        if acyclic {
            stack.proven.insert(ty.clone());
        }
        acyclic
    }

    fn visit_strategy(
        &self,
        strategy: &CodecStrategy,
        ty: &TypeRef,
        direction: Direction,
        stack: &mut FrameStack,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        match strategy.edge() {
            Edge::Leaf | Edge::Injected { lazy: true } => true,
            Edge::Bean => self.visit_bean(ty, direction, stack, diagnostics),
            Edge::Element { element, recursive } => {
                match self.registry.resolve(self.universe, element) {
                    Ok(strategy) => {
                        let strategy = if recursive {
                            strategy.recursive()
                        } else {
                            strategy
                        };
                        self.visit_strategy(&strategy, element, direction, stack, diagnostics)
                    }
                    Err(_) => true,
                }
            }
            Edge::Injected { lazy: false } => {
                let generated_bean = self.registry.is_generated(ty)
                    || ty
                        .path()
                        .is_some_and(|path| self.universe.is_standalone(path));
                let is_bean = self
                    .universe
                    .resolve(ty)
                    .is_some_and(|class| matches!(class.kind(), ClassKind::Bean));
                if generated_bean && is_bean {
                    self.visit_bean(ty, direction, stack, diagnostics)
                } else {
                    true
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::DependencyChecker;
    use crate::Diagnostics;
    use crate::info::{Annotation, Annotations, ClassInfo, FieldInfo, MethodInfo, TypeRef};
    use crate::info::TypeUniverse;
    use crate::registry::CodecRegistry;
    use alloc::format;

    fn field(name: &str, ty: &str) -> FieldInfo {
        FieldInfo::new(name, TypeRef::named(ty))
    }

    #[test]
    fn acyclic_graph_passes() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("a.Image").with_field(FieldInfo::new(
            "tags",
            TypeRef::list_of(TypeRef::named("a.Tag")),
        )));
        universe.insert(ClassInfo::bean("a.Tag").with_field(FieldInfo::new("value", TypeRef::string())));
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(checker.check(&TypeRef::named("a.Image"), &mut diagnostics));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn cycle_through_collection_reports_the_path() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("a.Tree").with_field(field("root", "a.Branch")));
        universe.insert(ClassInfo::bean("a.Branch").with_field(FieldInfo::new(
            "children",
            TypeRef::list_of(TypeRef::named("a.Branch")),
        )));
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(!checker.check(&TypeRef::named("a.Tree"), &mut diagnostics));
        // Once per direction.
        assert_eq!(diagnostics.problems().len(), 2);
        let message = &diagnostics.problems()[0].message;
        assert!(message.contains("Branch->children"), "{message}");
        assert!(message.contains("serialization"), "{message}");
    }

    #[test]
    fn recursive_properties_break_cycles() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("a.Node")
                .with_field(field("next", "a.Node").annotate(Annotation::Recursive))
                .with_field(
                    FieldInfo::new("children", TypeRef::list_of(TypeRef::named("a.Node")))
                        .annotate(Annotation::Recursive),
                ),
        );
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(checker.check(&TypeRef::named("a.Node"), &mut diagnostics));
    }

    #[test]
    fn eager_injection_into_generated_beans_is_followed() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("a.Left").with_field(field("right", "a.Right")));
        universe.insert(ClassInfo::bean("a.Right").with_field(field("left", "a.Left")));
        universe.attach_annotations("a.Right", Annotations::new().with(Annotation::Standalone));
        let mut registry = CodecRegistry::new();
        registry.prepend_generated(TypeRef::named("a.Left"));

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(!checker.check(&TypeRef::named("a.Left"), &mut diagnostics));
        let message = &diagnostics.problems()[0].message;
        assert!(message.contains("Left->right->left"), "{message}");
    }

    #[test]
    fn external_codecs_end_the_walk() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("a.Event").with_field(field("at", "a.Instant")));
        universe.insert(ClassInfo::bean("a.Instant").with_field(field("event", "a.Event")));
        universe.mark_external("a.Instant");
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(checker.check(&TypeRef::named("a.Event"), &mut diagnostics));
    }

    #[test]
    fn setter_types_are_walked_for_deserialization() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("a.Plain").with_field(FieldInfo::new("value", TypeRef::string())));
        universe.insert(
            ClassInfo::bean("a.Holder")
                .with_method(MethodInfo::getter("getItem", TypeRef::named("a.Plain")))
                .with_method(MethodInfo::setter("setItem", TypeRef::named("a.Holder"))),
        );
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(!checker.check(&TypeRef::named("a.Holder"), &mut diagnostics));
        assert_eq!(diagnostics.problems().len(), 1);
        let message = &diagnostics.problems()[0].message;
        assert!(message.contains("in deserialization:"), "{message}");
        assert!(message.contains("Holder->item"), "{message}");
    }

    #[test]
    fn shared_beans_are_walked_once() {
        // Every level references the next twice; without memoization the
        // walk would visit the bottom 2^40 times.
        const DEPTH: usize = 40;
        let mut universe = TypeUniverse::new();
        for level in 0..DEPTH {
            let next = format!("a.Level{}", level + 1);
            universe.insert(
                ClassInfo::bean(format!("a.Level{level}"))
                    .with_field(field("left", &next))
                    .with_field(field("right", &next)),
            );
        }
        universe.insert(
            ClassInfo::bean(format!("a.Level{DEPTH}"))
                .with_field(FieldInfo::new("value", TypeRef::string())),
        );
        let registry = CodecRegistry::new();

        let mut diagnostics = Diagnostics::new();
        let checker = DependencyChecker::new(&universe, &registry);
        assert!(checker.check(&TypeRef::named("a.Level0"), &mut diagnostics));
        assert!(diagnostics.is_empty());
    }
}
