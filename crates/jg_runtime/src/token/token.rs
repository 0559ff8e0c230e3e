use alloc::string::String;
use core::fmt;

// -----------------------------------------------------------------------------
// Token

/// One event of the hierarchical token stream.
///
/// Objects are framed by [`Token::BeginObject`] and [`Token::EndObject`] and
/// contain alternating [`Token::FieldName`] and value tokens. Arrays are framed
/// by [`Token::BeginArray`] and [`Token::EndArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    FieldName(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl Token {
    /// Returns the payload-free kind of this token.
    #[inline]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::BeginObject => TokenKind::BeginObject,
            Token::EndObject => TokenKind::EndObject,
            Token::BeginArray => TokenKind::BeginArray,
            Token::EndArray => TokenKind::EndArray,
            Token::FieldName(_) => TokenKind::FieldName,
            Token::Bool(_) => TokenKind::Bool,
            Token::Int(_) => TokenKind::Int,
            Token::Float(_) => TokenKind::Float,
            Token::Str(_) => TokenKind::Str,
            Token::Null => TokenKind::Null,
        }
    }
}

// -----------------------------------------------------------------------------
// TokenKind

/// The kind of a [`Token`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    FieldName,
    Bool,
    Int,
    Float,
    Str,
    Null,
}

impl TokenKind {
    /// Returns `true` for tokens that open a nested structure.
    #[inline]
    pub const fn is_begin(self) -> bool {
        matches!(self, TokenKind::BeginObject | TokenKind::BeginArray)
    }

    /// Returns `true` for tokens that close a nested structure.
    #[inline]
    pub const fn is_end(self) -> bool {
        matches!(self, TokenKind::EndObject | TokenKind::EndArray)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::BeginObject => "begin-object",
            TokenKind::EndObject => "end-object",
            TokenKind::BeginArray => "begin-array",
            TokenKind::EndArray => "end-array",
            TokenKind::FieldName => "field-name",
            TokenKind::Bool => "boolean",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Str => "string",
            TokenKind::Null => "null",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Location

/// Position of a token inside a stream, counted in tokens from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub index: usize,
}

impl Location {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self { index }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token #{}", self.index)
    }
}

// -----------------------------------------------------------------------------
// value_extent

/// Returns the number of tokens taken by the value starting at `tokens[0]`.
///
/// Returns `None` if the slice does not start with a complete value.
///
/// # Examples
///
/// ```
/// use jg_runtime::token::{Token, value_extent};
///
/// let tokens = [
///     Token::BeginArray,
///     Token::Int(1),
///     Token::EndArray,
///     Token::Null,
/// ];
/// assert_eq!(value_extent(&tokens), Some(3));
/// assert_eq!(value_extent(&tokens[3..]), Some(1));
/// assert_eq!(value_extent(&tokens[..2]), None);
/// ```
pub fn value_extent(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        let kind = token.kind();
        if kind.is_begin() {
            depth += 1;
        } else if kind.is_end() {
            depth = depth.checked_sub(1)?;
        } else if kind == TokenKind::FieldName {
            if depth == 0 {
                return None;
            }
            continue;
        }

        if depth == 0 {
            return Some(index + 1);
        }
    }
    None
}
