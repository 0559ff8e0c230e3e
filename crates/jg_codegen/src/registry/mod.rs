//! Strategy resolution: which codec behavior handles which type.

// -----------------------------------------------------------------------------
// Modules

mod linker;
mod strategy;

// -----------------------------------------------------------------------------
// Exports

pub use linker::{CodecRegistry, LinkError, RegistryEntry, StrategyKind};
pub use strategy::{CodecStrategy, Edge, EnumCase, SequenceShape};
