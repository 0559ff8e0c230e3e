use alloc::string::String;
use alloc::vec::Vec;

use super::{Token, TokenCursor};
use crate::EncodeError;
use crate::serde::TokenTree;

// -----------------------------------------------------------------------------
// TokenWriter

/// A sink for token stream events.
///
/// Only [`TokenWriter::write_token`] is required; the other methods are
/// shorthands for individual tokens.
pub trait TokenWriter {
    fn write_token(&mut self, token: Token) -> Result<(), EncodeError>;

    #[inline]
    fn begin_object(&mut self) -> Result<(), EncodeError> {
        self.write_token(Token::BeginObject)
    }

    #[inline]
    fn end_object(&mut self) -> Result<(), EncodeError> {
        self.write_token(Token::EndObject)
    }

    #[inline]
    fn begin_array(&mut self) -> Result<(), EncodeError> {
        self.write_token(Token::BeginArray)
    }

    #[inline]
    fn end_array(&mut self) -> Result<(), EncodeError> {
        self.write_token(Token::EndArray)
    }

    #[inline]
    fn field_name(&mut self, name: &str) -> Result<(), EncodeError> {
        self.write_token(Token::FieldName(String::from(name)))
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_token(Token::Bool(value))
    }

    #[inline]
    fn write_int(&mut self, value: i64) -> Result<(), EncodeError> {
        self.write_token(Token::Int(value))
    }

    #[inline]
    fn write_float(&mut self, value: f64) -> Result<(), EncodeError> {
        self.write_token(Token::Float(value))
    }

    #[inline]
    fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write_token(Token::Str(String::from(value)))
    }

    #[inline]
    fn write_null(&mut self) -> Result<(), EncodeError> {
        self.write_token(Token::Null)
    }
}

// -----------------------------------------------------------------------------
// TokenBuffer

/// A [`TokenWriter`] collecting tokens in memory.
///
/// A buffer is also the capture target of the serde bridge, see
/// [`crate::serde`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    #[inline]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    #[inline]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Turns the written tokens into a reader positioned at the first one.
    #[inline]
    pub fn into_cursor(self) -> TokenCursor {
        TokenCursor::new(self.tokens)
    }

    /// Borrows the written tokens as a serializable tree.
    #[inline]
    pub fn as_tree(&self) -> TokenTree<'_> {
        TokenTree::new(&self.tokens)
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

impl From<Vec<Token>> for TokenBuffer {
    #[inline]
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl TokenWriter for TokenBuffer {
    #[inline]
    fn write_token(&mut self, token: Token) -> Result<(), EncodeError> {
        self.tokens.push(token);
        Ok(())
    }
}
