use alloc::string::String;
use core::fmt;

use serde_core::de::{DeserializeSeed, Error, MapAccess, SeqAccess, Visitor};
use serde_core::{Deserialize, Deserializer};

use crate::token::{Token, TokenBuffer};

// -----------------------------------------------------------------------------
// TokenSeed

/// Appends the tokens of one deserialized value to a [`TokenBuffer`].
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use jg_runtime::serde::TokenSeed;
/// use jg_runtime::token::TokenBuffer;
///
/// let mut buffer = TokenBuffer::new();
/// let mut de = serde_json::Deserializer::from_str("[1, 2]");
/// TokenSeed::new(&mut buffer).deserialize(&mut de).unwrap();
/// assert_eq!(buffer.len(), 4);
/// ```
pub struct TokenSeed<'a> {
    out: &'a mut TokenBuffer,
}

impl<'a> TokenSeed<'a> {
    #[inline]
    pub fn new(out: &'a mut TokenBuffer) -> Self {
        Self { out }
    }
}

impl<'de> DeserializeSeed<'de> for TokenSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(TokenVisitor { out: self.out })
    }
}

impl<'de> Deserialize<'de> for TokenBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut buffer = TokenBuffer::new();
        TokenSeed::new(&mut buffer).deserialize(deserializer)?;
        Ok(buffer)
    }
}

// -----------------------------------------------------------------------------
// TokenVisitor

struct TokenVisitor<'a> {
    out: &'a mut TokenBuffer,
}

impl<'de> Visitor<'de> for TokenVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any self-describing value")
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<(), E> {
        self.out.push(Token::Bool(v));
        Ok(())
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<(), E> {
        self.out.push(Token::Int(v));
        Ok(())
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<(), E> {
        let v = i64::try_from(v).map_err(|_| E::custom("integer does not fit i64"))?;
        self.out.push(Token::Int(v));
        Ok(())
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<(), E> {
        self.out.push(Token::Float(v));
        Ok(())
    }

    fn visit_char<E: Error>(self, v: char) -> Result<(), E> {
        let mut text = String::new();
        text.push(v);
        self.out.push(Token::Str(text));
        Ok(())
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<(), E> {
        self.out.push(Token::Str(String::from(v)));
        Ok(())
    }

    fn visit_string<E: Error>(self, v: String) -> Result<(), E> {
        self.out.push(Token::Str(v));
        Ok(())
    }

    fn visit_unit<E: Error>(self) -> Result<(), E> {
        self.out.push(Token::Null);
        Ok(())
    }

    fn visit_none<E: Error>(self) -> Result<(), E> {
        self.out.push(Token::Null);
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let out = self.out;
        out.push(Token::BeginArray);
        while seq
            .next_element_seed(TokenSeed { out: &mut *out })?
            .is_some()
        {}
        out.push(Token::EndArray);
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let out = self.out;
        out.push(Token::BeginObject);
        while let Some(key) = map.next_key::<String>()? {
            out.push(Token::FieldName(key));
            map.next_value_seed(TokenSeed { out: &mut *out })?;
        }
        out.push(Token::EndObject);
        Ok(())
    }
}
