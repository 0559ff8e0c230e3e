use alloc::string::String;
use alloc::vec::Vec;

use super::SynthContext;
use crate::bean::{BeanDefinition, Direction};
use crate::info::TypeRef;
use crate::plan::{EncodeOp, EncodeProperty, Local};

/// Inlines the serialization of bean `ty`: one token object with its
/// properties in declaration order, unwrapped ones flattened in place.
///
/// Returns `None` after reporting to the context's diagnostics.
pub fn encode_bean(cx: &mut SynthContext<'_>, ty: &TypeRef) -> Option<EncodeOp> {
    let definition = cx.introspect(ty, Direction::Serialize)?;
    if !cx.push_inline(ty, None) {
        return None;
    }
    let properties = encode_properties(cx, &definition);
    cx.pop_inline();

    let temp = cx.new_local(&ty.simple_name());
    Some(EncodeOp::Object {
        temp,
        properties: properties?,
    })
}

fn encode_properties(
    cx: &mut SynthContext<'_>,
    definition: &BeanDefinition,
) -> Option<Vec<EncodeProperty>> {
    let mut out = Vec::with_capacity(definition.properties().len());
    let mut complete = true;

    for property in definition.properties() {
        let Some(read) = property.read_access() else {
            cx.diagnostics().fail(
                "property has no getter or field to read from",
                Some(property.element()),
            );
            complete = false;
            continue;
        };

        cx.enter(property.name());
        let encoded = if property.is_unwrapped() {
            unwrapped(cx, property.ty(), property.element()).map(|(temp, properties)| {
                EncodeProperty::Unwrapped {
                    read,
                    temp,
                    properties,
                }
            })
        } else {
            cx.property_strategy(property)
                .and_then(|strategy| strategy.encode_plan(cx, property.ty()))
                .map(|value| EncodeProperty::Field {
                    name: String::from(property.name()),
                    read,
                    value,
                })
        };
        cx.leave();

        match encoded {
            Some(encoded) => out.push(encoded),
            None => complete = false,
        }
    }

    complete.then_some(out)
}

fn unwrapped(
    cx: &mut SynthContext<'_>,
    ty: &TypeRef,
    element: &str,
) -> Option<(Local, Vec<EncodeProperty>)> {
    let definition = cx.introspect(ty, Direction::Serialize)?;
    if !cx.push_inline(ty, Some(element)) {
        return None;
    }
    let properties = encode_properties(cx, &definition);
    cx.pop_inline();

    let temp = cx.new_local(&ty.simple_name());
    Some((temp, properties?))
}
