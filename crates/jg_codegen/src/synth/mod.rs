//! Codec synthesis: turning resolved strategies into [plans](crate::plan).

// -----------------------------------------------------------------------------
// Modules

mod context;
mod decode;
mod encode;

// -----------------------------------------------------------------------------
// Exports

pub use context::SynthContext;
pub use decode::decode_bean;
pub use encode::encode_bean;

// -----------------------------------------------------------------------------
// Dispatch

use alloc::boxed::Box;
use alloc::string::ToString;

use crate::info::{Primitive, TypeRef};
use crate::plan::{DecodeOp, EncodeOp};
use crate::registry::CodecStrategy;

impl CodecStrategy {
    /// Emits the encode operation for a value of `ty`.
    ///
    /// Returns `None` after reporting to the context's diagnostics.
    pub fn encode_plan(&self, cx: &mut SynthContext<'_>, ty: &TypeRef) -> Option<EncodeOp> {
        Some(match self {
            CodecStrategy::Scalar(Primitive::Boolean) => EncodeOp::Boolean,
            CodecStrategy::Scalar(primitive) => EncodeOp::Number(*primitive),
            CodecStrategy::String => EncodeOp::String,
            CodecStrategy::Sequence {
                element, recursive, ..
            } => {
                cx.enter("[]");
                let element_op = element_strategy(cx, element, *recursive)
                    .and_then(|strategy| strategy.encode_plan(cx, element));
                cx.leave();
                EncodeOp::Sequence {
                    element: Box::new(element_op?),
                }
            }
            CodecStrategy::Enum { cases } => EncodeOp::Enum {
                type_name: ty.to_string(),
                cases: cases.clone(),
            },
            CodecStrategy::Injected { lazy } => EncodeOp::Injected {
                field: cx.request_injection(ty, *lazy),
            },
            CodecStrategy::Bean => return encode_bean(cx, ty),
            CodecStrategy::Nullable(inner) => {
                let temp = cx.new_local("tmp");
                EncodeOp::Nullable {
                    temp,
                    inner: Box::new(inner.encode_plan(cx, ty)?),
                }
            }
        })
    }

    /// Emits the decode operation for a value of `ty`.
    ///
    /// Returns `None` after reporting to the context's diagnostics.
    pub fn decode_plan(&self, cx: &mut SynthContext<'_>, ty: &TypeRef) -> Option<DecodeOp> {
        Some(match self {
            CodecStrategy::Scalar(Primitive::Boolean) => DecodeOp::Boolean,
            CodecStrategy::Scalar(primitive) => DecodeOp::Number(*primitive),
            CodecStrategy::String => DecodeOp::String,
            CodecStrategy::Sequence {
                element, recursive, ..
            } => {
                cx.enter("[]");
                let element_op = element_strategy(cx, element, *recursive)
                    .and_then(|strategy| strategy.decode_plan(cx, element));
                cx.leave();
                DecodeOp::Sequence {
                    element: Box::new(element_op?),
                }
            }
            CodecStrategy::Enum { cases } => DecodeOp::Enum {
                type_name: ty.to_string(),
                cases: cases.clone(),
            },
            CodecStrategy::Injected { lazy } => DecodeOp::Injected {
                field: cx.request_injection(ty, *lazy),
            },
            CodecStrategy::Bean => return decode_bean(cx, ty),
            CodecStrategy::Nullable(inner) => {
                DecodeOp::Nullable(Box::new(inner.decode_plan(cx, ty)?))
            }
        })
    }
}

fn element_strategy(
    cx: &mut SynthContext<'_>,
    element: &TypeRef,
    recursive: bool,
) -> Option<CodecStrategy> {
    let strategy = cx.resolve(element, None)?;
    Some(if recursive { strategy.recursive() } else { strategy })
}
