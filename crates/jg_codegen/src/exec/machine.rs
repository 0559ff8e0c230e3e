use alloc::vec::Vec;
use core::mem;

use jg_runtime::token::{Token, TokenKind, TokenReader, TokenWriter};
use jg_runtime::{DecodeError, EncodeError, ObjectModel, Value};

use super::CodecSet;
use crate::GeneratedCodec;
use crate::bean::{ReadAccess, WriteAccess};
use crate::info::{Primitive, TypeRef};
use crate::plan::{Assembly, DecodeOp, EncodeOp, EncodeProperty, ObjectDecoder, Source};

// -----------------------------------------------------------------------------
// Machine

/// Runs the plan of one generated codec method.
///
/// The frame holds the method's locals; each invocation of a codec gets its
/// own machine, so injected codecs never share a frame.
pub(super) struct Machine<'s, M> {
    set: &'s CodecSet<M>,
    codec: &'s GeneratedCodec,
    frame: Vec<Value>,
}

impl<'s, M: ObjectModel> Machine<'s, M> {
    pub(super) fn new(set: &'s CodecSet<M>, codec: &'s GeneratedCodec, locals: usize) -> Self {
        let mut frame = Vec::with_capacity(locals);
        frame.resize(locals, Value::Null);
        Self { set, codec, frame }
    }

    fn injected(&self, field: &str) -> Option<&'s TypeRef> {
        self.codec
            .injections
            .iter()
            .find(|injection| injection.field == field)
            .map(|injection| &injection.target)
    }

    // -------------------------------------------------------------------------
    // Encode

    pub(super) fn encode(
        &mut self,
        op: &EncodeOp,
        value: &Value,
        writer: &mut dyn TokenWriter,
    ) -> Result<(), EncodeError> {
        match op {
            EncodeOp::Boolean => match value {
                Value::Bool(value) => writer.write_bool(*value),
                other => Err(unexpected_value("boolean", other)),
            },
            EncodeOp::Number(primitive) => match value {
                Value::Int(value) if primitive.is_integral() => writer.write_int(*value),
                Value::Int(value) => writer.write_float(*value as f64),
                Value::Float(value) if primitive.is_floating() => writer.write_float(*value),
                other => Err(unexpected_value(primitive.name(), other)),
            },
            EncodeOp::String => match value {
                Value::Str(value) => writer.write_str(value),
                other => Err(unexpected_value("string", other)),
            },
            EncodeOp::Sequence { element } => {
                let Value::Array(items) = value else {
                    return Err(unexpected_value("array", value));
                };
                writer.begin_array()?;
                for item in items {
                    self.encode(element, item, writer)?;
                }
                writer.end_array()
            }
            EncodeOp::Enum { type_name, cases } => {
                let Value::Enum(constant) = value else {
                    return Err(unexpected_value("enum", value));
                };
                match cases.iter().find(|case| case.constant == *constant) {
                    Some(case) => writer.write_str(&case.literal),
                    None => Err(EncodeError::UnknownEnumConstant {
                        type_name: type_name.clone(),
                        constant: constant.clone(),
                    }),
                }
            }
            EncodeOp::Nullable { temp, inner } => {
                self.frame[temp.index] = value.clone();
                if value.is_null() {
                    writer.write_null()
                } else {
                    self.encode(inner, value, writer)
                }
            }
            EncodeOp::Injected { field } => match self.injected(field) {
                Some(target) => self.set.encode_dyn(target, value, writer),
                None => Err(EncodeError::MissingCodec {
                    type_name: field.clone(),
                }),
            },
            EncodeOp::Object { temp, properties } => {
                value.as_object()?;
                self.frame[temp.index] = value.clone();
                writer.begin_object()?;
                self.encode_properties(properties, value, writer)?;
                writer.end_object()
            }
        }
    }

    fn encode_properties(
        &mut self,
        properties: &[EncodeProperty],
        target: &Value,
        writer: &mut dyn TokenWriter,
    ) -> Result<(), EncodeError> {
        for property in properties {
            match property {
                EncodeProperty::Field { name, read, value } => {
                    let current = self.read(target, read)?;
                    writer.field_name(name)?;
                    self.encode(value, &current, writer)?;
                }
                EncodeProperty::Unwrapped {
                    read,
                    temp,
                    properties,
                } => {
                    let nested = self.read(target, read)?;
                    self.frame[temp.index] = nested.clone();
                    // An absent unwrapped object contributes no fields.
                    if !nested.is_null() {
                        self.encode_properties(properties, &nested, writer)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn read(&self, target: &Value, read: &ReadAccess) -> Result<Value, EncodeError> {
        let model = self.set.model();
        Ok(match read {
            ReadAccess::Getter(method) => model.invoke_getter(target, method)?,
            ReadAccess::Field(field) => model.read_field(target, field)?,
        })
    }

    // -------------------------------------------------------------------------
    // Decode

    pub(super) fn decode(
        &mut self,
        op: &DecodeOp,
        reader: &mut dyn TokenReader,
    ) -> Result<Value, DecodeError> {
        match op {
            DecodeOp::Boolean => match reader.current() {
                Some(Token::Bool(value)) => {
                    let value = *value;
                    reader.advance();
                    Ok(Value::Bool(value))
                }
                _ => Err(reader.unexpected("boolean")),
            },
            DecodeOp::Number(primitive) => decode_number(*primitive, reader),
            DecodeOp::String => match reader.current() {
                Some(Token::Str(value)) => {
                    let value = value.clone();
                    reader.advance();
                    Ok(Value::Str(value))
                }
                _ => Err(reader.unexpected("string")),
            },
            DecodeOp::Sequence { element } => {
                reader.expect(TokenKind::BeginArray)?;
                let mut items = Vec::new();
                while reader.current_kind()? != TokenKind::EndArray {
                    items.push(self.decode(element, reader)?);
                }
                reader.advance();
                Ok(Value::Array(items))
            }
            DecodeOp::Enum { type_name, cases } => {
                let location = reader.location();
                let Some(Token::Str(literal)) = reader.current() else {
                    return Err(reader.unexpected("enum literal"));
                };
                match cases.iter().find(|case| case.literal == *literal) {
                    Some(case) => {
                        let constant = case.constant.clone();
                        reader.advance();
                        Ok(Value::Enum(constant))
                    }
                    None => Err(DecodeError::UnknownEnumLiteral {
                        type_name: type_name.clone(),
                        literal: literal.clone(),
                        location,
                    }),
                }
            }
            DecodeOp::Nullable(inner) => {
                if matches!(reader.current(), Some(Token::Null)) {
                    reader.advance();
                    Ok(Value::Null)
                } else {
                    self.decode(inner, reader)
                }
            }
            DecodeOp::Injected { field } => match self.injected(field) {
                Some(target) => self.set.decode_dyn(target, reader),
                None => Err(DecodeError::MissingCodec {
                    type_name: field.clone(),
                }),
            },
            DecodeOp::Object(decoder) => self.decode_object(decoder, reader),
        }
    }

    fn decode_object(
        &mut self,
        decoder: &ObjectDecoder,
        reader: &mut dyn TokenReader,
    ) -> Result<Value, DecodeError> {
        reader.expect(TokenKind::BeginObject)?;
        for leaf in &decoder.leaves {
            self.frame[leaf.local.index] = leaf.zero.clone();
        }
        let mut seen = decoder.tracking.fresh();

        loop {
            let location = reader.location();
            let name = match reader.current() {
                Some(Token::EndObject) => None,
                Some(Token::FieldName(name)) => Some(name.clone()),
                _ => return Err(reader.unexpected("field name or end of object")),
            };
            reader.advance();
            let Some(name) = name else {
                break;
            };

            let Some(&index) = decoder.dispatch.get(&name) else {
                if decoder.ignore_unknown {
                    reader.skip_value()?;
                    continue;
                }
                return Err(DecodeError::UnknownProperty {
                    type_name: decoder.type_name.clone(),
                    name,
                    location,
                });
            };

            let leaf = &decoder.leaves[index];
            if seen.put(index) {
                return Err(DecodeError::DuplicateProperty {
                    name: leaf.name.clone(),
                    location,
                });
            }
            let value = self.decode(&leaf.value, reader)?;
            self.frame[leaf.local.index] = value;
        }

        if !decoder.tracking.is_satisfied(&seen)
            && let Some(missing) = decoder.tracking.first_missing(&seen)
        {
            return Err(DecodeError::MissingProperty {
                name: decoder.leaves[missing].name.clone(),
                location: reader.location(),
            });
        }

        self.assemble(&decoder.assembly)
    }

    fn assemble(&mut self, assembly: &Assembly) -> Result<Value, DecodeError> {
        let mut arguments = Vec::with_capacity(assembly.arguments.len());
        for source in &assembly.arguments {
            arguments.push(self.source(source)?);
        }

        let set = self.set;
        let model = set.model();
        let mut object = model.construct(&assembly.type_name, &assembly.creator, arguments)?;
        for (write, source) in &assembly.apply {
            let value = self.source(source)?;
            match write {
                WriteAccess::Setter(method) => model.invoke_setter(&mut object, method, value)?,
                WriteAccess::Field(field) => model.write_field(&mut object, field, value)?,
            }
        }
        Ok(object)
    }

    fn source(&mut self, source: &Source) -> Result<Value, DecodeError> {
        match source {
            Source::Local(local) => Ok(mem::take(&mut self.frame[local.index])),
            Source::Nested(assembly) => self.assemble(assembly),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn unexpected_value(expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::UnexpectedValue {
        expected,
        found: found.kind_name(),
    }
}

fn decode_number(primitive: Primitive, reader: &mut dyn TokenReader) -> Result<Value, DecodeError> {
    let location = reader.location();
    let value = match reader.current() {
        Some(Token::Int(value)) => number_from_int(primitive, *value),
        Some(Token::Float(value)) => number_from_float(primitive, *value),
        _ => return Err(reader.unexpected(primitive.name())),
    };
    let Some(value) = value else {
        return Err(DecodeError::InvalidNumber {
            target: primitive.name(),
            location,
        });
    };
    reader.advance();
    Ok(value)
}

fn number_from_int(primitive: Primitive, value: i64) -> Option<Value> {
    if primitive.is_floating() {
        return Some(Value::Float(value as f64));
    }
    let (min, max) = primitive.range()?;
    (min..=max).contains(&value).then_some(Value::Int(value))
}

/// Integral targets accept a float only if it holds an integer exactly.
fn number_from_float(primitive: Primitive, value: f64) -> Option<Value> {
    if primitive.is_floating() {
        return Some(Value::Float(value));
    }
    // `as` saturates, so the range is checked before the cast.
    if !(-9.223372036854775808e18..9.223372036854775808e18).contains(&value) {
        return None;
    }
    let truncated = value as i64;
    if truncated as f64 != value {
        return None;
    }
    number_from_int(primitive, truncated)
}
