use alloc::vec::Vec;

use super::{Location, Token, TokenKind};
use crate::DecodeError;

// -----------------------------------------------------------------------------
// TokenReader

/// A cursor over a token stream.
///
/// Decode logic is entered with the cursor on the first token of the value
/// being read and must return with the cursor just past the value's last
/// token.
pub trait TokenReader {
    /// The token under the cursor, `None` once the stream is exhausted.
    fn current(&self) -> Option<&Token>;

    /// Moves the cursor one token forward.
    fn advance(&mut self);

    /// Location of the token under the cursor.
    fn location(&self) -> Location;

    /// Kind of the token under the cursor, failing at end of stream.
    fn current_kind(&self) -> Result<TokenKind, DecodeError> {
        match self.current() {
            Some(token) => Ok(token.kind()),
            None => Err(DecodeError::UnexpectedEnd {
                location: self.location(),
            }),
        }
    }

    /// Builds the error for the token under the cursor not being `expected`.
    fn unexpected(&self, expected: &'static str) -> DecodeError {
        match self.current() {
            Some(token) => DecodeError::UnexpectedToken {
                expected,
                found: token.kind(),
                location: self.location(),
            },
            None => DecodeError::UnexpectedEnd {
                location: self.location(),
            },
        }
    }

    /// Consumes one payload-free token of kind `expected`.
    fn expect(&mut self, expected: TokenKind) -> Result<(), DecodeError> {
        if self.current_kind()? != expected {
            return Err(self.unexpected(expected.as_str()));
        }
        self.advance();
        Ok(())
    }

    /// Consumes the whole value under the cursor, including nested
    /// structures, and discards it.
    ///
    /// # Examples
    ///
    /// ```
    /// use jg_runtime::token::{Token, TokenCursor, TokenReader};
    ///
    /// let mut cursor = TokenCursor::new(vec![
    ///     Token::BeginObject,
    ///     Token::FieldName("a".into()),
    ///     Token::BeginArray,
    ///     Token::Null,
    ///     Token::EndArray,
    ///     Token::EndObject,
    ///     Token::Bool(true),
    /// ]);
    ///
    /// cursor.skip_value().unwrap();
    /// assert_eq!(cursor.current(), Some(&Token::Bool(true)));
    /// ```
    fn skip_value(&mut self) -> Result<(), DecodeError> {
        let mut depth = 0usize;
        loop {
            let kind = self.current_kind()?;
            if kind.is_begin() {
                depth += 1;
            } else if kind.is_end() {
                if depth == 0 {
                    return Err(self.unexpected("value"));
                }
                depth -= 1;
            } else if kind == TokenKind::FieldName && depth == 0 {
                return Err(self.unexpected("value"));
            }

            self.advance();
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

// -----------------------------------------------------------------------------
// TokenCursor

/// An in-memory [`TokenReader`] over an owned token list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    #[inline]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` once every token has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Tokens not consumed yet.
    #[inline]
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.position..).unwrap_or(&[])
    }

    #[inline]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenCursor {
    #[inline]
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenReader for TokenCursor {
    #[inline]
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    #[inline]
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    #[inline]
    fn location(&self) -> Location {
        Location::new(self.position)
    }
}

// -----------------------------------------------------------------------------
// Tests
