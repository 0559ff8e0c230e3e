use alloc::string::String;
use alloc::vec::Vec;

use jg_runtime::{AccessError, CreatorKind, CreatorRef, Instance, ObjectModel, Value};

use crate::bean::decapitalize;
use crate::info::{ClassInfo, MethodInfo, TypeUniverse};

/// Supertype chains longer than this are treated as cyclic.
const MAX_HIERARCHY_DEPTH: usize = 64;

/// An [`ObjectModel`] over [`Instance`] values, driven by the declarations
/// in a [`TypeUniverse`].
///
/// Fields map to the slot of the same name. Accessor methods and creator
/// parameters map to their bound slot, or else to the name they imply:
/// `getValue`, `isValue` and `setValue` all use slot `value`.
///
/// # Examples
///
/// ```
/// use jg_codegen::exec::DescriptorModel;
/// use jg_codegen::info::{ClassInfo, MethodInfo, TypeRef, TypeUniverse};
/// use jg_runtime::{Instance, ObjectModel, Value};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(
///     ClassInfo::bean("example.Tag")
///         .with_method(MethodInfo::getter("getValue", TypeRef::string())),
/// );
///
/// let model = DescriptorModel::new(&universe);
/// let tag = Value::from(Instance::new("example.Tag").with("value", "gif"));
/// assert_eq!(model.invoke_getter(&tag, "getValue"), Ok(Value::from("gif")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DescriptorModel<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> DescriptorModel<'u> {
    #[inline]
    pub const fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    fn class(&self, type_name: &str) -> Result<&'u ClassInfo, AccessError> {
        self.universe
            .get(type_name)
            .ok_or_else(|| AccessError::UnknownType {
                type_name: String::from(type_name),
            })
    }

    /// Finds an instance method by name, searching supertypes too.
    fn method(&self, type_name: &str, name: &str) -> Result<&'u MethodInfo, AccessError> {
        let mut class = self.class(type_name)?;
        for _ in 0..MAX_HIERARCHY_DEPTH {
            if let Some(method) = class.methods().iter().find(|method| method.name() == name) {
                return Ok(method);
            }
            match class.superclass().and_then(|parent| self.universe.resolve(parent)) {
                Some(parent) => class = parent,
                None => break,
            }
        }
        Err(AccessError::UnknownMember {
            type_name: String::from(type_name),
            member: String::from(name),
        })
    }

    fn accessor_slot(
        &self,
        type_name: &str,
        name: &str,
        prefixes: &[&str],
    ) -> Result<String, AccessError> {
        let method = self.method(type_name, name)?;
        if let Some(slot) = method.slot() {
            return Ok(String::from(slot));
        }
        let implied = prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix).filter(|rest| !rest.is_empty()));
        Ok(match implied {
            Some(rest) => decapitalize(rest),
            None => String::from(name),
        })
    }
}

impl ObjectModel for DescriptorModel<'_> {
    fn read_field(&self, target: &Value, field: &str) -> Result<Value, AccessError> {
        target.as_object()?.slot(field).cloned()
    }

    fn invoke_getter(&self, target: &Value, method: &str) -> Result<Value, AccessError> {
        let instance = target.as_object()?;
        let slot = self.accessor_slot(instance.type_name(), method, &["get", "is"])?;
        instance.slot(&slot).cloned()
    }

    fn write_field(&self, target: &mut Value, field: &str, value: Value) -> Result<(), AccessError> {
        target.as_object_mut()?.set(field, value);
        Ok(())
    }

    fn invoke_setter(
        &self,
        target: &mut Value,
        method: &str,
        value: Value,
    ) -> Result<(), AccessError> {
        let instance = target.as_object_mut()?;
        let slot = self.accessor_slot(instance.type_name(), method, &["set"])?;
        instance.set(slot, value);
        Ok(())
    }

    fn construct(
        &self,
        type_name: &str,
        creator: &CreatorRef,
        args: Vec<Value>,
    ) -> Result<Value, AccessError> {
        let class = self.class(type_name)?;
        let declared = match creator.kind {
            CreatorKind::Implicit => None,
            CreatorKind::Constructor => Some(class.constructors().get(creator.index)),
            CreatorKind::Factory => Some(class.methods().get(creator.index)),
        };
        let params = match declared {
            None => &[][..],
            Some(Some(method)) => method.params(),
            Some(None) => {
                return Err(AccessError::UnknownMember {
                    type_name: String::from(type_name),
                    member: creator.name.clone(),
                });
            }
        };
        if params.len() != args.len() {
            return Err(AccessError::ArityMismatch {
                creator: creator.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }

        let mut instance = Instance::new(type_name);
        for (param, arg) in params.iter().zip(args) {
            instance.set(param.slot(), arg);
        }
        Ok(Value::Object(instance))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::DescriptorModel;
    use crate::info::{ClassInfo, MethodInfo, ParamInfo, Primitive, TypeRef, TypeUniverse};
    use alloc::vec;
    use jg_runtime::{AccessError, CreatorRef, Instance, ObjectModel, Value};

    fn universe() -> TypeUniverse {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("t.Base")
                .with_method(MethodInfo::getter("isActive", TypeRef::primitive(Primitive::Boolean))),
        );
        universe.insert(
            ClassInfo::bean("t.Point")
                .extends(TypeRef::named("t.Base"))
                .with_method(MethodInfo::getter("getX", TypeRef::primitive(Primitive::Int)))
                .with_method(
                    MethodInfo::setter("moveTo", TypeRef::primitive(Primitive::Int)).bind_slot("x"),
                )
                .with_constructor(MethodInfo::constructor(vec![
                    ParamInfo::new("a", TypeRef::primitive(Primitive::Int)).bind_slot("x"),
                ])),
        );
        universe
    }

    #[test]
    fn accessors_map_to_slots() {
        let universe = universe();
        let model = DescriptorModel::new(&universe);

        let mut point = model
            .construct("t.Point", &CreatorRef::constructor(0), vec![Value::Int(3)])
            .unwrap();
        assert_eq!(model.invoke_getter(&point, "getX"), Ok(Value::Int(3)));

        model.invoke_setter(&mut point, "moveTo", Value::Int(5)).unwrap();
        assert_eq!(model.read_field(&point, "x"), Ok(Value::Int(5)));

        model.write_field(&mut point, "active", Value::Bool(true)).unwrap();
        assert_eq!(model.invoke_getter(&point, "isActive"), Ok(Value::Bool(true)));
    }

    #[test]
    fn access_failures() {
        let universe = universe();
        let model = DescriptorModel::new(&universe);

        assert_eq!(
            model.construct("t.Point", &CreatorRef::constructor(0), vec![]),
            Err(AccessError::ArityMismatch {
                creator: "<init>".into(),
                expected: 1,
                found: 0,
            })
        );
        assert!(matches!(
            model.construct("t.Nope", &CreatorRef::implicit(), vec![]),
            Err(AccessError::UnknownType { .. })
        ));

        let point = Value::from(Instance::new("t.Point"));
        assert!(matches!(
            model.invoke_getter(&point, "getY"),
            Err(AccessError::UnknownMember { .. })
        ));
        assert!(matches!(
            model.invoke_getter(&point, "getX"),
            Err(AccessError::MissingSlot { .. })
        ));
        assert!(matches!(
            model.read_field(&Value::Int(1), "x"),
            Err(AccessError::NotAnObject { found: "integer" })
        ));
    }
}
