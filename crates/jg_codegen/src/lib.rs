#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod check;
mod config;
mod diag;
mod generate;

pub mod bean;
pub mod exec;
pub mod info;
pub mod plan;
pub mod registry;
pub mod scope;
pub mod synth;

// -----------------------------------------------------------------------------
// Top-level exports

pub use check::DependencyChecker;
pub use config::GeneratorConfig;
pub use diag::{Diagnostics, Problem, Severity};
pub use generate::{GeneratedCodec, GenerationOutput, Generator};
pub use registry::{CodecRegistry, CodecStrategy, LinkError};
