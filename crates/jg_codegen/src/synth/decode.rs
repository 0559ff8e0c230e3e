use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use jg_runtime::Value;

use super::SynthContext;
use crate::bean::{BeanDefinition, Direction, Property};
use crate::info::{Primitive, TypeRef};
use crate::plan::{Assembly, DecodeOp, LeafProperty, Local, ObjectDecoder, Source, TrackingMask};

// -----------------------------------------------------------------------------
// BeanTree

/// A bean definition with unwrapped properties expanded into nested trees.
struct BeanTree {
    definition: BeanDefinition,
    slots: Vec<Slot>,
}

enum Slot {
    /// Index into the flattened leaf list.
    Leaf(usize),
    Nested(Box<BeanTree>),
}

fn build_tree(
    cx: &mut SynthContext<'_>,
    ty: &TypeRef,
    element: Option<&str>,
    leaves: &mut Vec<Property>,
) -> Option<BeanTree> {
    let definition = cx.introspect(ty, Direction::Deserialize)?;
    if !cx.push_inline(ty, element) {
        return None;
    }

    let mut slots = Vec::with_capacity(definition.properties().len());
    let mut complete = true;
    for property in definition.properties() {
        if property.is_unwrapped() {
            cx.enter(property.name());
            let nested = build_tree(cx, property.ty(), Some(property.element()), leaves);
            cx.leave();
            match nested {
                Some(nested) => slots.push(Slot::Nested(Box::new(nested))),
                None => complete = false,
            }
        } else {
            slots.push(Slot::Leaf(leaves.len()));
            leaves.push(property.clone());
        }
    }

    // An unwrapped subtree is guarded only while it expands; the root stays
    // marked until `decode_bean` has planned the leaves.
    if element.is_some() {
        cx.pop_inline();
    }
    complete.then_some(BeanTree { definition, slots })
}

// -----------------------------------------------------------------------------
// decode_bean

/// Inlines the deserialization of bean `ty`.
///
/// All leaves of the unwrapped tree are read from one token object through a
/// single dispatch table; the object is then assembled bottom-up, creator
/// arguments first and remaining writes after construction.
///
/// Returns `None` after reporting to the context's diagnostics.
pub fn decode_bean(cx: &mut SynthContext<'_>, ty: &TypeRef) -> Option<DecodeOp> {
    let mark = cx.inline_mark();
    let decoded = decode_inlined(cx, ty);
    cx.restore_inline(mark);
    decoded
}

fn decode_inlined(cx: &mut SynthContext<'_>, ty: &TypeRef) -> Option<DecodeOp> {
    let mut properties = Vec::new();
    let tree = build_tree(cx, ty, None, &mut properties)?;

    let mut leaves = Vec::with_capacity(properties.len());
    let mut dispatch = BTreeMap::new();
    let mut tracking = TrackingMask::new(properties.len());
    let mut complete = true;

    for (index, property) in properties.iter().enumerate() {
        let aliases = property.aliases().iter().map(String::as_str);
        for wire in core::iter::once(property.name()).chain(aliases) {
            if let Some(previous) = dispatch.insert(String::from(wire), index)
                && previous != index
            {
                cx.diagnostics().fail(
                    format!(
                        "duplicate wire name `{wire}` in `{ty}`: used by `{}` and `{}`",
                        properties[previous].name(),
                        property.name(),
                    ),
                    Some(property.element()),
                );
                complete = false;
            }
        }
        if property.is_required() {
            tracking.require(index);
        }

        cx.enter(property.name());
        let value = cx
            .property_strategy(property)
            .and_then(|strategy| strategy.decode_plan(cx, property.ty()));
        cx.leave();

        let local = cx.new_local(property.name());
        match value {
            Some(value) => leaves.push(LeafProperty {
                name: String::from(property.name()),
                local,
                zero: zero_value(property.ty()),
                value,
            }),
            None => complete = false,
        }
    }

    if !complete {
        return None;
    }

    let locals: Vec<Local> = leaves.iter().map(|leaf| leaf.local.clone()).collect();
    let assembly = assemble(&tree, &locals);
    Some(DecodeOp::Object(Box::new(ObjectDecoder {
        type_name: ty.to_string(),
        leaves,
        dispatch,
        tracking,
        ignore_unknown: tree.definition.ignore_unknown(),
        assembly,
    })))
}

/// The value a property's local holds when the property is absent.
fn zero_value(ty: &TypeRef) -> Value {
    match ty.as_primitive() {
        Some(Primitive::Boolean) => Value::Bool(false),
        Some(primitive) if primitive.is_floating() => Value::Float(0.0),
        Some(primitive) if primitive.is_integral() => Value::Int(0),
        _ => Value::Null,
    }
}

fn assemble(tree: &BeanTree, locals: &[Local]) -> Assembly {
    let definition = &tree.definition;
    let mut sources: Vec<Option<Source>> = tree
        .slots
        .iter()
        .map(|slot| {
            Some(match slot {
                Slot::Leaf(index) => Source::Local(locals[*index].clone()),
                Slot::Nested(nested) => Source::Nested(Box::new(assemble(nested, locals))),
            })
        })
        .collect();

    let arguments = definition
        .creator()
        .params()
        .iter()
        .filter_map(|&index| sources[index].take())
        .collect();

    debug_assert!(
        definition
            .properties()
            .iter()
            .all(|property| property.creator_param().is_some() || property.write_access().is_some()),
        "every property of `{}` is either a creator argument or writable",
        definition.ty(),
    );
    let apply = definition
        .properties()
        .iter()
        .zip(sources)
        .filter_map(|(property, source)| Some((property.write_access()?, source?)))
        .collect();

    Assembly {
        type_name: String::from(definition.ty().path().unwrap_or_default()),
        creator: definition.creator().reference().clone(),
        arguments,
        apply,
    }
}
