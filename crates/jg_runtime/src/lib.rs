#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod model;
mod value;

pub mod serde;
pub mod token;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::{AccessError, DecodeError, EncodeError};
pub use model::{CreatorKind, CreatorRef, ObjectModel};
pub use value::{Instance, Value};
