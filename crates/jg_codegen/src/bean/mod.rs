//! The property model and the introspector building it.

// -----------------------------------------------------------------------------
// Modules

mod definition;
mod introspect;
mod property;

// -----------------------------------------------------------------------------
// Exports

pub use definition::{BeanDefinition, Creator};
pub use introspect::{Introspector, decapitalize};
pub use property::{Direction, Property, PropertyFlags, ReadAccess, WriteAccess};
