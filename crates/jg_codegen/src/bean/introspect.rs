use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use jg_runtime::CreatorRef;
use jg_utils::hash::HashMap;

use super::{BeanDefinition, Creator, Direction, Property, PropertyFlags};
use crate::Diagnostics;
use crate::diag::Severity;
use crate::info::{Annotations, ClassInfo, CreatorMode, FieldInfo, MethodInfo, MethodKind};
use crate::info::{Primitive, TypeRef, TypeUniverse};

/// Supertype chains longer than this are treated as cyclic.
const MAX_HIERARCHY_DEPTH: usize = 64;

// -----------------------------------------------------------------------------
// decapitalize

/// Derives a property name from an accessor suffix.
///
/// The first character is lowercased, unless the first two characters are
/// both uppercase, in which case the suffix is kept as is.
///
/// ```
/// use jg_codegen::bean::decapitalize;
///
/// assert_eq!(decapitalize("Id"), "id");
/// assert_eq!(decapitalize("URL"), "URL");
/// assert_eq!(decapitalize("X"), "x");
/// ```
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.next()
        && first.is_uppercase()
        && second.is_uppercase()
    {
        return String::from(name);
    }

    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

fn getter_name(method: &MethodInfo, returns: &TypeRef) -> Option<String> {
    if !method.params().is_empty() || method.is_void() {
        return None;
    }
    let name = method.name();
    if let Some(rest) = name.strip_prefix("get")
        && !rest.is_empty()
    {
        return Some(decapitalize(rest));
    }
    match name.strip_prefix("is") {
        Some(rest) if !rest.is_empty() && *returns == TypeRef::primitive(Primitive::Boolean) => {
            Some(decapitalize(rest))
        }
        _ => None,
    }
}

fn setter_name(method: &MethodInfo) -> Option<String> {
    if method.params().len() != 1 {
        return None;
    }
    match method.name().strip_prefix("set") {
        Some(rest) if !rest.is_empty() => Some(decapitalize(rest)),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Accessors

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum AccessorKind {
    Ignorable,
    Implicit,
    Visible,
    Explicit,
}

impl AccessorKind {
    fn of(annotations: &Annotations) -> Self {
        if annotations.is_ignored() {
            return AccessorKind::Ignorable;
        }
        match annotations.property_name() {
            Some(Some(_)) => AccessorKind::Explicit,
            Some(None) => AccessorKind::Visible,
            None => AccessorKind::Implicit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Field,
    Getter,
    Setter,
}

impl Role {
    const ALL: [Role; 3] = [Role::Field, Role::Getter, Role::Setter];

    const fn as_str(self) -> &'static str {
        match self {
            Role::Field => "field",
            Role::Getter => "getter",
            Role::Setter => "setter",
        }
    }
}

#[derive(Debug)]
struct Accessor<'u> {
    implicit: String,
    kind: AccessorKind,
    member: &'u str,
    ty: TypeRef,
    accessible: bool,
    immutable: bool,
    annotations: &'u Annotations,
    element: String,
}

impl Accessor<'_> {
    fn explicit_name(&self) -> Option<&str> {
        match self.kind {
            AccessorKind::Explicit => self.annotations.explicit_name(),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct CreatorParam<'u> {
    index: usize,
    ty: TypeRef,
    annotations: &'u Annotations,
    element: String,
}

// -----------------------------------------------------------------------------
// Bucket

/// Accessors gathered under one property name.
#[derive(Debug, Default)]
struct Bucket<'u> {
    name: String,
    field: Option<Accessor<'u>>,
    getter: Option<Accessor<'u>>,
    setter: Option<Accessor<'u>>,
    creator_param: Option<CreatorParam<'u>>,
}

impl<'u> Bucket<'u> {
    fn slot(&mut self, role: Role) -> &mut Option<Accessor<'u>> {
        match role {
            Role::Field => &mut self.field,
            Role::Getter => &mut self.getter,
            Role::Setter => &mut self.setter,
        }
    }

    fn accessors_in_order(&self, direction: Direction) -> [Option<&Accessor<'u>>; 3] {
        match direction {
            Direction::Serialize => [
                self.getter.as_ref(),
                self.setter.as_ref(),
                self.field.as_ref(),
            ],
            Direction::Deserialize => [
                self.setter.as_ref(),
                self.getter.as_ref(),
                self.field.as_ref(),
            ],
        }
    }

    /// Every annotation source of the property, most significant first.
    ///
    /// The creator parameter leads when deserializing and trails when
    /// serializing.
    fn annotated_in_order(&self, direction: Direction) -> Vec<&Annotations> {
        let accessors = self
            .accessors_in_order(direction)
            .into_iter()
            .flatten()
            .map(|accessor| accessor.annotations);
        let param = self.creator_param.as_ref().map(|param| param.annotations);
        match direction {
            Direction::Serialize => accessors.chain(param).collect(),
            Direction::Deserialize => param.into_iter().chain(accessors).collect(),
        }
    }

    fn is_ignored(&self) -> bool {
        [&self.field, &self.getter, &self.setter]
            .into_iter()
            .flatten()
            .any(|accessor| accessor.kind == AccessorKind::Ignorable)
    }
}

// -----------------------------------------------------------------------------
// Scanner

struct Scanner<'u> {
    direction: Direction,
    buckets: Vec<Bucket<'u>>,
    index: HashMap<String, usize>,
}

impl<'u> Scanner<'u> {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            buckets: Vec::new(),
            index: HashMap::default(),
        }
    }

    fn bucket(&mut self, name: &str) -> &mut Bucket<'u> {
        let index = match self.index.get(name) {
            Some(&index) => index,
            None => {
                let index = self.buckets.len();
                self.buckets.push(Bucket {
                    name: String::from(name),
                    ..Bucket::default()
                });
                self.index.insert(String::from(name), index);
                index
            }
        };
        &mut self.buckets[index]
    }

    fn add(&mut self, role: Role, accessor: Accessor<'u>, diagnostics: &mut Diagnostics) {
        let name = accessor.implicit.clone();
        let slot = self.bucket(&name).slot(role);
        let replace = match slot.as_ref() {
            None => true,
            Some(existing) if existing.kind != accessor.kind => existing.kind < accessor.kind,
            Some(existing) => {
                diagnostics.fail(
                    format!(
                        "conflicting {} accessors `{}` and `{}` for property `{name}`",
                        role.as_str(),
                        existing.member,
                        accessor.member,
                    ),
                    Some(&accessor.element),
                );
                false
            }
        };
        if replace {
            *slot = Some(accessor);
        }
    }

    fn scan_field(&mut self, member: &Member<'u, FieldInfo>, diagnostics: &mut Diagnostics) {
        let field = member.decl;
        if field.is_static() {
            return;
        }
        let accessor = Accessor {
            implicit: String::from(field.name()),
            kind: AccessorKind::of(field.annotations()),
            member: field.name(),
            ty: member.ty.clone(),
            accessible: field.visibility().is_accessible(),
            immutable: field.is_immutable(),
            annotations: field.annotations(),
            element: format!("{}#{}", member.owner, field.name()),
        };
        self.add(Role::Field, accessor, diagnostics);
    }

    fn scan_method(&mut self, member: &Member<'u, MethodInfo>, diagnostics: &mut Diagnostics) {
        let method = member.decl;
        if method.kind() != MethodKind::Instance {
            return;
        }
        let kind = AccessorKind::of(method.annotations());
        let element = format!("{}#{}()", member.owner, method.name());
        let first_param = || member.params.first().cloned();

        let (role, implicit, ty) = if let Some(name) = getter_name(method, &member.ty) {
            (Role::Getter, name, Some(member.ty.clone()))
        } else if let Some(name) = setter_name(method) {
            (Role::Setter, name, first_param())
        } else if kind > AccessorKind::Implicit {
            match member.params.len() {
                0 if !method.is_void() => (
                    Role::Getter,
                    String::from(method.name()),
                    Some(member.ty.clone()),
                ),
                1 => (Role::Setter, String::from(method.name()), first_param()),
                _ => {
                    diagnostics.fail(
                        "method is marked as a property but is neither a getter nor a setter",
                        Some(&element),
                    );
                    return;
                }
            }
        } else {
            return;
        };

        let Some(ty) = ty else {
            return;
        };
        let accessor = Accessor {
            implicit,
            kind,
            member: method.name(),
            ty,
            accessible: method.visibility().is_accessible(),
            immutable: false,
            annotations: method.annotations(),
            element,
        };
        self.add(role, accessor, diagnostics);
    }

    /// Renames buckets to their final wire names and merges buckets that
    /// end up with the same name.
    fn resolve_names(&mut self, diagnostics: &mut Diagnostics) {
        let buckets = core::mem::take(&mut self.buckets);
        self.index.clear();

        for mut bucket in buckets {
            let name = bucket
                .accessors_in_order(self.direction)
                .into_iter()
                .flatten()
                .find_map(Accessor::explicit_name)
                .map(String::from);
            if let Some(name) = name {
                bucket.name = name;
            }

            match self.index.get(&bucket.name) {
                Some(&index) => merge(&mut self.buckets[index], bucket, diagnostics),
                None => {
                    self.index.insert(bucket.name.clone(), self.buckets.len());
                    self.buckets.push(bucket);
                }
            }
        }
    }
}

fn merge<'u>(target: &mut Bucket<'u>, mut source: Bucket<'u>, diagnostics: &mut Diagnostics) {
    let name = target.name.clone();
    for role in Role::ALL {
        let Some(accessor) = source.slot(role).take() else {
            continue;
        };
        let slot = target.slot(role);
        if let Some(existing) = slot.as_ref() {
            diagnostics.fail(
                format!(
                    "conflicting {} accessors `{}` and `{}` for property `{name}`",
                    role.as_str(),
                    existing.member,
                    accessor.member,
                ),
                Some(&accessor.element),
            );
        } else {
            *slot = Some(accessor);
        }
    }
}

// -----------------------------------------------------------------------------
// Members

/// A member with its type as seen from the introspected type.
struct Member<'u, T> {
    decl: &'u T,
    owner: &'u str,
    /// Field type, or method return type.
    ty: TypeRef,
    params: Vec<TypeRef>,
}

// -----------------------------------------------------------------------------
// Introspector

/// Builds [`BeanDefinition`]s from type declarations.
///
/// # Examples
///
/// ```
/// use jg_codegen::Diagnostics;
/// use jg_codegen::bean::{Direction, Introspector};
/// use jg_codegen::info::{ClassInfo, FieldInfo, MethodInfo, TypeRef, TypeUniverse};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(
///     ClassInfo::bean("example.Tag")
///         .with_field(FieldInfo::new("value", TypeRef::string()).private())
///         .with_method(MethodInfo::getter("getValue", TypeRef::string()))
///         .with_method(MethodInfo::setter("setValue", TypeRef::string())),
/// );
///
/// let mut diagnostics = Diagnostics::new();
/// let tag = Introspector::new(&universe)
///     .introspect(&TypeRef::named("example.Tag"), Direction::Deserialize, &mut diagnostics)
///     .unwrap();
///
/// let value = tag.property("value").unwrap();
/// assert_eq!(value.setter(), Some("setValue"));
/// assert_eq!(value.field(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Introspector<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> Introspector<'u> {
    #[inline]
    pub const fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    /// Builds the definition of `ty` for `direction`.
    ///
    /// Every problem found is recorded in `diagnostics`; `None` is returned
    /// if any of them is a failure.
    pub fn introspect(
        &self,
        ty: &TypeRef,
        direction: Direction,
        diagnostics: &mut Diagnostics,
    ) -> Option<BeanDefinition> {
        let failures = diagnostics.count(Severity::Fail);
        let type_name = ty.to_string();

        let Some(class) = self.universe.resolve(ty) else {
            diagnostics.fail(
                format!("cannot introspect `{ty}`: not a declared type"),
                Some(&type_name),
            );
            return None;
        };
        if class.is_enum() {
            diagnostics.fail(
                format!("`{ty}` is an enum, not a bean"),
                Some(&type_name),
            );
            return None;
        }

        let chain = self.hierarchy(class, ty, diagnostics)?;
        let (fields, methods) = collect_members(&chain);

        let mut scanner = Scanner::new(direction);
        for field in &fields {
            scanner.scan_field(field, diagnostics);
        }
        for method in &methods {
            scanner.scan_method(method, diagnostics);
        }
        scanner.resolve_names(diagnostics);

        let bindings = class.bindings(ty);
        let creator = self.bind_creator(class, &bindings, &mut scanner, diagnostics);

        let properties = build_properties(&scanner, direction, diagnostics);

        let creator_params = match direction {
            Direction::Serialize => Vec::new(),
            Direction::Deserialize => {
                let count = scanner
                    .buckets
                    .iter()
                    .filter_map(|bucket| bucket.creator_param.as_ref())
                    .count();
                (0..count)
                    .filter_map(|index| {
                        properties
                            .iter()
                            .position(|property| property.creator_param == Some(index))
                    })
                    .collect()
            }
        };

        if diagnostics.count(Severity::Fail) > failures {
            return None;
        }
        let creator = creator?;

        let ignore_unknown = self
            .universe
            .class_annotation(class.path(), Annotations::ignore_unknown)
            .unwrap_or(false);

        log::debug!(
            "introspected `{ty}` for {}: {} properties",
            direction.as_str(),
            properties.len(),
        );

        Some(BeanDefinition {
            ty: ty.clone(),
            properties,
            creator: Creator {
                reference: creator,
                params: creator_params,
            },
            ignore_unknown,
        })
    }

    /// The class and its supertypes, root-most first, with the generic
    /// bindings each one is seen under.
    fn hierarchy(
        &self,
        class: &'u ClassInfo,
        ty: &TypeRef,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<(&'u ClassInfo, Vec<(String, TypeRef)>)>> {
        let mut chain: Vec<(&'u ClassInfo, Vec<(String, TypeRef)>)> = Vec::new();
        let mut class = class;
        let mut current = ty.clone();

        loop {
            let bindings = class.bindings(&current);
            let superclass = class.superclass().map(|sup| sup.substitute(&bindings));
            chain.push((class, bindings));

            let Some(superclass) = superclass else {
                break;
            };
            // Supertypes outside the universe contribute no members.
            let Some(parent) = self.universe.resolve(&superclass) else {
                break;
            };
            if chain.len() >= MAX_HIERARCHY_DEPTH
                || chain.iter().any(|(seen, _)| seen.path() == parent.path())
            {
                diagnostics.fail(
                    format!("cyclic inheritance through `{}`", parent.path()),
                    Some(class.path()),
                );
                return None;
            }
            class = parent;
            current = superclass;
        }

        chain.reverse();
        Some(chain)
    }

    fn bind_creator(
        &self,
        class: &'u ClassInfo,
        bindings: &[(String, TypeRef)],
        scanner: &mut Scanner<'u>,
        diagnostics: &mut Diagnostics,
    ) -> Option<CreatorRef> {
        let mut chosen: Option<(CreatorRef, &'u MethodInfo, CreatorMode)> = None;

        let candidates = class
            .constructors()
            .iter()
            .enumerate()
            .map(|(index, ctor)| (CreatorRef::constructor(index), ctor))
            .chain(
                class
                    .methods()
                    .iter()
                    .enumerate()
                    .map(|(index, method)| (CreatorRef::factory(method.name(), index), method)),
            );

        for (reference, method) in candidates {
            let Some(mode) = method.annotations().creator_mode() else {
                continue;
            };
            if mode == CreatorMode::Disabled {
                continue;
            }
            let element = format!("{}#{}", class.path(), method.name());
            if method.kind() == MethodKind::Instance {
                diagnostics.fail(
                    "creator must be a constructor or a static method",
                    Some(&element),
                );
                continue;
            }
            if !method.visibility().is_accessible() {
                diagnostics.fail("creator is not accessible", Some(&element));
                continue;
            }
            if let Some((_, previous, _)) = &chosen {
                diagnostics.fail(
                    format!(
                        "multiple creators configured: `{}` and `{}`",
                        previous.name(),
                        method.name(),
                    ),
                    Some(&element),
                );
                continue;
            }
            chosen = Some((reference, method, mode));
        }

        let Some((reference, method, mode)) = chosen else {
            if !class.has_default_constructor() {
                diagnostics.fail(
                    "no default constructor and no creator configured",
                    Some(class.path()),
                );
                return None;
            }
            return Some(
                class
                    .constructors()
                    .iter()
                    .position(|ctor| ctor.params().is_empty())
                    .map_or_else(CreatorRef::implicit, CreatorRef::constructor),
            );
        };

        let element = format!("{}#{}", class.path(), method.name());
        let params = method.params();
        let delegating = match mode {
            CreatorMode::Delegating => true,
            CreatorMode::Default => {
                params.len() == 1 && params[0].annotations().explicit_name().is_none()
            }
            CreatorMode::Properties | CreatorMode::Disabled => false,
        };
        if delegating {
            diagnostics.fail("delegating creators are not supported", Some(&element));
            return None;
        }

        let mut complete = true;
        for (index, param) in params.iter().enumerate() {
            let param_element = format!("{element}({})", param.name());
            let Some(name) = param.annotations().explicit_name() else {
                diagnostics.fail(
                    "creator parameter has no property name",
                    Some(&param_element),
                );
                complete = false;
                continue;
            };
            let bucket = scanner.bucket(name);
            if bucket.creator_param.is_some() {
                diagnostics.fail(
                    format!("creator binds property `{name}` twice"),
                    Some(&param_element),
                );
                complete = false;
                continue;
            }
            bucket.creator_param = Some(CreatorParam {
                index,
                ty: param.ty().substitute(bindings),
                annotations: param.annotations(),
                element: param_element,
            });
        }

        complete.then_some(reference)
    }
}

fn collect_members<'u>(
    chain: &[(&'u ClassInfo, Vec<(String, TypeRef)>)],
) -> (Vec<Member<'u, FieldInfo>>, Vec<Member<'u, MethodInfo>>) {
    let mut fields: Vec<Member<'u, FieldInfo>> = Vec::new();
    let mut methods: Vec<Member<'u, MethodInfo>> = Vec::new();

    for (class, bindings) in chain {
        for field in class.fields() {
            let member = Member {
                decl: field,
                owner: class.path(),
                ty: field.ty().substitute(bindings),
                params: Vec::new(),
            };
            match fields.iter_mut().find(|seen| seen.decl.name() == field.name()) {
                Some(shadowed) => *shadowed = member,
                None => fields.push(member),
            }
        }
        for method in class.methods() {
            let member = Member {
                decl: method,
                owner: class.path(),
                ty: method.returns().substitute(bindings),
                params: method
                    .params()
                    .iter()
                    .map(|param| param.ty().substitute(bindings))
                    .collect(),
            };
            match methods.iter_mut().find(|seen| method.overrides(seen.decl)) {
                Some(overridden) => *overridden = member,
                None => methods.push(member),
            }
        }
    }

    (fields, methods)
}

fn build_properties(
    scanner: &Scanner<'_>,
    direction: Direction,
    diagnostics: &mut Diagnostics,
) -> Vec<Property> {
    let mut properties = Vec::with_capacity(scanner.buckets.len());

    for bucket in &scanner.buckets {
        if bucket.is_ignored() {
            if direction == Direction::Deserialize
                && let Some(param) = &bucket.creator_param
            {
                diagnostics.fail(
                    format!(
                        "property `{}` is ignored but bound to a creator parameter",
                        bucket.name
                    ),
                    Some(&param.element),
                );
            }
            continue;
        }

        let field = bucket.field.as_ref().filter(|field| {
            field.accessible && !(direction == Direction::Deserialize && field.immutable)
        });
        let getter = bucket.getter.as_ref().filter(|getter| getter.accessible);
        let setter = bucket.setter.as_ref().filter(|setter| setter.accessible);

        let (ty, element) = match direction {
            Direction::Serialize => match getter.or(field) {
                Some(accessor) => (accessor.ty.clone(), accessor.element.clone()),
                None => continue,
            },
            Direction::Deserialize => match (&bucket.creator_param, setter.or(field)) {
                (Some(param), _) => (param.ty.clone(), param.element.clone()),
                (None, Some(accessor)) => (accessor.ty.clone(), accessor.element.clone()),
                (None, None) => continue,
            },
        };

        let sources = bucket.annotated_in_order(direction);
        let mut flags = PropertyFlags::empty();

        let nullable = sources
            .iter()
            .find_map(|annotations| annotations.nullability())
            .unwrap_or(false);
        if nullable {
            if ty.as_primitive().is_some() {
                diagnostics.warn(
                    format!("nullable has no effect on primitive property `{}`", bucket.name),
                    Some(&element),
                );
            } else {
                flags |= PropertyFlags::NULLABLE;
            }
        }
        if sources.iter().any(|annotations| annotations.is_unwrapped()) {
            flags |= PropertyFlags::UNWRAPPED;
        }
        if sources.iter().any(|annotations| annotations.is_recursive()) {
            flags |= PropertyFlags::RECURSIVE;
        }
        if flags.contains(PropertyFlags::UNWRAPPED | PropertyFlags::RECURSIVE) {
            diagnostics.fail(
                format!(
                    "property `{}` cannot be both unwrapped and recursive",
                    bucket.name
                ),
                Some(&element),
            );
        }
        let required = sources
            .iter()
            .find_map(|annotations| annotations.required())
            .unwrap_or(bucket.creator_param.is_some());
        if required {
            flags |= PropertyFlags::REQUIRED;
        }

        let mut aliases: Vec<String> = Vec::new();
        for alias in sources.iter().flat_map(|annotations| annotations.aliases()) {
            if alias != bucket.name && !aliases.iter().any(|seen| seen == alias) {
                aliases.push(String::from(alias));
            }
        }

        let property = match direction {
            Direction::Serialize => Property {
                name: bucket.name.clone(),
                ty,
                field: match getter {
                    Some(_) => None,
                    None => field.map(|field| String::from(field.member)),
                },
                getter: getter.map(|getter| String::from(getter.member)),
                setter: None,
                creator_param: None,
                aliases,
                flags,
                element,
            },
            Direction::Deserialize => {
                let bound = bucket.creator_param.as_ref().map(|param| param.index);
                let (setter, field) = match (bound, setter) {
                    (Some(_), _) => (None, None),
                    (None, Some(setter)) => (Some(String::from(setter.member)), None),
                    (None, None) => (None, field.map(|field| String::from(field.member))),
                };
                Property {
                    name: bucket.name.clone(),
                    ty,
                    field,
                    getter: None,
                    setter,
                    creator_param: bound,
                    aliases,
                    flags,
                    element,
                }
            }
        };
        properties.push(property);
    }

    properties
}

// -----------------------------------------------------------------------------
// Tests
