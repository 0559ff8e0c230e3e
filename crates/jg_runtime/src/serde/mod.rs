//! Bridges between serde data formats and the token stream.
//!
//! [`TokenBuffer`](crate::token::TokenBuffer) implements `Deserialize`, so any
//! self-describing format can be captured as tokens:
//!
//! ```
//! use jg_runtime::token::{Token, TokenBuffer};
//!
//! let buffer: TokenBuffer = serde_json::from_str(r#"{"id":1,"id":2}"#).unwrap();
//! assert_eq!(buffer.tokens(), &[
//!     Token::BeginObject,
//!     Token::FieldName("id".into()),
//!     Token::Int(1),
//!     Token::FieldName("id".into()),
//!     Token::Int(2),
//!     Token::EndObject,
//! ]);
//! ```
//!
//! Repeated object keys are kept in order, which is what lets decode logic
//! report duplicate properties. In the other direction, [`TokenTree`]
//! renders one value back through any serializer.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::TokenSeed;
pub use ser::TokenTree;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::token::{Token, TokenBuffer, TokenWriter};
    use alloc::string::String;
    use alloc::vec;

    fn image() -> TokenBuffer {
        let mut buffer = TokenBuffer::new();
        buffer.begin_object().unwrap();
        buffer.field_name("id").unwrap();
        buffer.write_int(123).unwrap();
        buffer.field_name("uri").unwrap();
        buffer.write_str("https://x").unwrap();
        buffer.field_name("tags").unwrap();
        buffer.begin_array().unwrap();
        buffer.begin_object().unwrap();
        buffer.field_name("value").unwrap();
        buffer.write_str("popcorn").unwrap();
        buffer.end_object().unwrap();
        buffer.end_array().unwrap();
        buffer.end_object().unwrap();
        buffer
    }

    #[test]
    fn json_output() {
        let text = serde_json::to_string(&image().as_tree()).unwrap();
        assert_eq!(
            text,
            r#"{"id":123,"uri":"https://x","tags":[{"value":"popcorn"}]}"#
        );
    }

    #[test]
    fn json_capture() {
        let text = r#"{"id":123,"uri":"https://x","tags":[{"value":"popcorn"}]}"#;
        let buffer: TokenBuffer = serde_json::from_str(text).unwrap();
        assert_eq!(buffer, image());
    }

    #[test]
    fn scalars() {
        let buffer: TokenBuffer = serde_json::from_str("[true, null, -4, 2.5, \"s\"]").unwrap();
        assert_eq!(
            buffer.tokens(),
            &[
                Token::BeginArray,
                Token::Bool(true),
                Token::Null,
                Token::Int(-4),
                Token::Float(2.5),
                Token::Str(String::from("s")),
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn integer_out_of_range() {
        let result: Result<TokenBuffer, _> = serde_json::from_str("18446744073709551615");
        assert!(result.is_err());
    }

    #[test]
    fn ron_capture() {
        let buffer: TokenBuffer = ron::from_str(r#"{"value": "gif"}"#).unwrap();
        assert_eq!(
            buffer.into_tokens(),
            vec![
                Token::BeginObject,
                Token::FieldName(String::from("value")),
                Token::Str(String::from("gif")),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn malformed_tree() {
        let buffer = TokenBuffer::from(vec![Token::BeginObject, Token::Int(1)]);
        assert!(serde_json::to_string(&buffer.as_tree()).is_err());
    }
}
