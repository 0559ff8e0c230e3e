use alloc::boxed::Box;
use alloc::string::{String, ToString};

use jg_runtime::token::{TokenReader, TokenWriter};
use jg_runtime::{DecodeError, EncodeError, ObjectModel, Value};
use jg_utils::hash::HashMap;
use thiserror::Error;

use super::machine::Machine;
use crate::GeneratedCodec;
use crate::info::TypeRef;

// -----------------------------------------------------------------------------
// ExternalCodec

/// A codec supplied by the host rather than generated.
pub trait ExternalCodec {
    fn encode(&self, value: &Value, writer: &mut dyn TokenWriter) -> Result<(), EncodeError>;

    fn decode(&self, reader: &mut dyn TokenReader) -> Result<Value, DecodeError>;
}

// -----------------------------------------------------------------------------
// LinkageError

/// An eager injection without a codec to fill it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LinkageError {
    #[error("`{codec}` injects `{target}` into `{field}`, but no codec is registered for it")]
    MissingInjection {
        codec: String,
        field: String,
        target: TypeRef,
    },
}

// -----------------------------------------------------------------------------
// CodecSet

/// Generated and host-supplied codecs, keyed by value type, executed against
/// an [`ObjectModel`].
///
/// Injected fields of a generated codec resolve to the codec registered for
/// their target type. Eager injections are verified by
/// [`CodecSet::link`]; lazy ones are looked up on first use.
pub struct CodecSet<M> {
    model: M,
    generated: HashMap<TypeRef, GeneratedCodec>,
    external: HashMap<TypeRef, Box<dyn ExternalCodec>>,
}

impl<M: ObjectModel> CodecSet<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            generated: HashMap::default(),
            external: HashMap::default(),
        }
    }

    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Registers a generated codec, returning the one it replaces.
    pub fn insert_generated(&mut self, codec: GeneratedCodec) -> Option<GeneratedCodec> {
        self.generated.insert(codec.value_type.clone(), codec)
    }

    pub fn insert_external(&mut self, ty: TypeRef, codec: impl ExternalCodec + 'static) {
        self.external.insert(ty, Box::new(codec));
    }

    #[inline]
    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.generated.contains_key(ty) || self.external.contains_key(ty)
    }

    #[inline]
    pub fn generated(&self, ty: &TypeRef) -> Option<&GeneratedCodec> {
        self.generated.get(ty)
    }

    /// Checks that every eager injection has a codec.
    pub fn link(&self) -> Result<(), LinkageError> {
        for codec in self.generated.values() {
            for injection in &codec.injections {
                if !injection.lazy && !self.contains(&injection.target) {
                    return Err(LinkageError::MissingInjection {
                        codec: codec.name.clone(),
                        field: injection.field.clone(),
                        target: injection.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn encode<W: TokenWriter>(
        &self,
        ty: &TypeRef,
        value: &Value,
        writer: &mut W,
    ) -> Result<(), EncodeError> {
        self.encode_dyn(ty, value, writer)
    }

    /// Decodes one value, leaving the reader just past it.
    pub fn decode<R: TokenReader>(&self, ty: &TypeRef, reader: &mut R) -> Result<Value, DecodeError> {
        self.decode_dyn(ty, reader)
    }

    /// Decodes one value that must make up the entire stream.
    pub fn decode_document<R: TokenReader>(
        &self,
        ty: &TypeRef,
        reader: &mut R,
    ) -> Result<Value, DecodeError> {
        let value = self.decode_dyn(ty, reader)?;
        if reader.current().is_some() {
            return Err(DecodeError::TrailingTokens {
                location: reader.location(),
            });
        }
        Ok(value)
    }

    pub(super) fn encode_dyn(
        &self,
        ty: &TypeRef,
        value: &Value,
        writer: &mut dyn TokenWriter,
    ) -> Result<(), EncodeError> {
        if let Some(codec) = self.generated.get(ty) {
            let mut machine = Machine::new(self, codec, codec.encode.locals.len());
            return machine.encode(&codec.encode.body, value, writer);
        }
        match self.external.get(ty) {
            Some(codec) => codec.encode(value, writer),
            None => Err(EncodeError::MissingCodec {
                type_name: ty.to_string(),
            }),
        }
    }

    pub(super) fn decode_dyn(
        &self,
        ty: &TypeRef,
        reader: &mut dyn TokenReader,
    ) -> Result<Value, DecodeError> {
        if let Some(codec) = self.generated.get(ty) {
            let mut machine = Machine::new(self, codec, codec.decode.locals.len());
            return machine.decode(&codec.decode.body, reader);
        }
        match self.external.get(ty) {
            Some(codec) => codec.decode(reader),
            None => Err(DecodeError::MissingCodec {
                type_name: ty.to_string(),
            }),
        }
    }
}

impl<M: ObjectModel> Extend<GeneratedCodec> for CodecSet<M> {
    fn extend<T: IntoIterator<Item = GeneratedCodec>>(&mut self, iter: T) {
        for codec in iter {
            self.insert_generated(codec);
        }
    }
}
