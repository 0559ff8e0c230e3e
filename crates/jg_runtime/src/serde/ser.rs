use serde_core::ser::{Error, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use crate::token::{Token, value_extent};

// -----------------------------------------------------------------------------
// TokenTree

/// A borrowed token slice holding exactly one value, serializable through
/// any serde serializer.
///
/// Objects are written as maps with entries in stream order, arrays as
/// sequences.
#[derive(Debug, Clone, Copy)]
pub struct TokenTree<'a> {
    tokens: &'a [Token],
}

impl<'a> TokenTree<'a> {
    #[inline]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens }
    }

    #[inline]
    pub const fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Splits off the first value of `tokens`.
    fn split<E: Error>(tokens: &'a [Token]) -> Result<(TokenTree<'a>, &'a [Token]), E> {
        let len = value_extent(tokens).ok_or_else(|| E::custom("incomplete token value"))?;
        let (head, tail) = tokens.split_at(len);
        Ok((TokenTree::new(head), tail))
    }
}

impl Serialize for TokenTree<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(first) = self.tokens.first() else {
            return Err(S::Error::custom("empty token value"));
        };

        match first {
            Token::Bool(value) => serializer.serialize_bool(*value),
            Token::Int(value) => serializer.serialize_i64(*value),
            Token::Float(value) => serializer.serialize_f64(*value),
            Token::Str(value) => serializer.serialize_str(value),
            Token::Null => serializer.serialize_unit(),
            Token::BeginArray => {
                let mut seq = serializer.serialize_seq(None)?;
                let mut rest = &self.tokens[1..];
                loop {
                    match rest.first() {
                        Some(Token::EndArray) => break,
                        Some(_) => {
                            let (element, tail) = TokenTree::split::<S::Error>(rest)?;
                            seq.serialize_element(&element)?;
                            rest = tail;
                        }
                        None => return Err(S::Error::custom("unterminated array")),
                    }
                }
                seq.end()
            }
            Token::BeginObject => {
                let mut map = serializer.serialize_map(None)?;
                let mut rest = &self.tokens[1..];
                loop {
                    match rest.first() {
                        Some(Token::EndObject) => break,
                        Some(Token::FieldName(name)) => {
                            let (value, tail) = TokenTree::split::<S::Error>(&rest[1..])?;
                            map.serialize_entry(name.as_str(), &value)?;
                            rest = tail;
                        }
                        Some(_) => return Err(S::Error::custom("expected a field name")),
                        None => return Err(S::Error::custom("unterminated object")),
                    }
                }
                map.end()
            }
            Token::EndObject | Token::EndArray | Token::FieldName(_) => {
                Err(S::Error::custom("token slice does not start with a value"))
            }
        }
    }
}
