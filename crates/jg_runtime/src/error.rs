use alloc::string::String;

use thiserror::Error;

use crate::token::{Location, TokenKind};

// -----------------------------------------------------------------------------
// DecodeError

/// An error raised while decoding a token stream.
///
/// Decode errors are not recoverable for the call that raised them: the
/// cursor is left wherever the failure was detected.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("expected {expected} but found {found} at {location}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        location: Location,
    },
    #[error("unexpected end of token stream at {location}")]
    UnexpectedEnd { location: Location },
    #[error("duplicate property `{name}` at {location}")]
    DuplicateProperty { name: String, location: Location },
    #[error("missing property `{name}` at {location}")]
    MissingProperty { name: String, location: Location },
    #[error("unknown property `{name}` for `{type_name}` at {location}")]
    UnknownProperty {
        type_name: String,
        name: String,
        location: Location,
    },
    #[error("unknown literal `{literal}` for enum `{type_name}` at {location}")]
    UnknownEnumLiteral {
        type_name: String,
        literal: String,
        location: Location,
    },
    #[error("number does not fit `{target}` at {location}")]
    InvalidNumber {
        target: &'static str,
        location: Location,
    },
    #[error("trailing tokens after value at {location}")]
    TrailingTokens { location: Location },
    #[error("no codec linked for `{type_name}`")]
    MissingCodec { type_name: String },
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl DecodeError {
    /// Stream location of the failure, if it happened while reading tokens.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::UnexpectedToken { location, .. }
            | Self::UnexpectedEnd { location }
            | Self::DuplicateProperty { location, .. }
            | Self::MissingProperty { location, .. }
            | Self::UnknownProperty { location, .. }
            | Self::UnknownEnumLiteral { location, .. }
            | Self::InvalidNumber { location, .. }
            | Self::TrailingTokens { location } => Some(*location),
            Self::MissingCodec { .. } | Self::Access(_) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// EncodeError

/// An error raised while encoding a value.
///
/// Generated encode logic does not validate on its own; these errors come
/// from the writer or from a host value whose dynamic shape does not match
/// the codec.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("expected {expected} value but found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
    #[error("enum `{type_name}` has no constant `{constant}`")]
    UnknownEnumConstant { type_name: String, constant: String },
    #[error("no codec linked for `{type_name}`")]
    MissingCodec { type_name: String },
    #[error("token writer failed: {0}")]
    Writer(String),
    #[error(transparent)]
    Access(#[from] AccessError),
}

// -----------------------------------------------------------------------------
// AccessError

/// An error raised by an [`ObjectModel`](crate::ObjectModel).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("expected an object but found {found}")]
    NotAnObject { found: &'static str },
    #[error("unknown type `{type_name}`")]
    UnknownType { type_name: String },
    #[error("type `{type_name}` has no member `{member}`")]
    UnknownMember { type_name: String, member: String },
    #[error("instance of `{type_name}` has no slot `{slot}`")]
    MissingSlot { type_name: String, slot: String },
    #[error("creator `{creator}` takes {expected} arguments but {found} were supplied")]
    ArityMismatch {
        creator: String,
        expected: usize,
        found: usize,
    },
}
