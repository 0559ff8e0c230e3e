//! Host type descriptors: the input of the engine.

// -----------------------------------------------------------------------------
// Modules

mod annotations;
mod class_info;
mod member;
mod type_ref;
mod universe;

// -----------------------------------------------------------------------------
// Exports

pub use annotations::{Annotation, Annotations, CreatorMode};
pub use class_info::{ClassInfo, ClassKind, EnumConstant};
pub use member::{FieldInfo, MethodInfo, MethodKind, ParamInfo, Visibility};
pub use type_ref::{Primitive, TypeRef, known};
pub use universe::TypeUniverse;
