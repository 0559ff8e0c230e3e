#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use jg_codegen as codegen;
pub use jg_runtime as runtime;
pub use jg_utils as utils;
