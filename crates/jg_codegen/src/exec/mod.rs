//! Running generated codecs.
//!
//! [`CodecSet`] interprets the [plans](crate::plan) of generated codecs
//! against a token stream, reaching host objects through an
//! [`ObjectModel`](jg_runtime::ObjectModel). [`DescriptorModel`] is a model
//! over dynamic [`Instance`](jg_runtime::Instance) values driven by a
//! [`TypeUniverse`](crate::info::TypeUniverse).
//!
//! # Examples
//!
//! ```
//! use jg_codegen::Generator;
//! use jg_codegen::exec::{CodecSet, DescriptorModel};
//! use jg_codegen::info::{ClassInfo, FieldInfo, TypeRef, TypeUniverse};
//! use jg_runtime::token::{TokenBuffer, TokenWriter};
//! use jg_runtime::{Instance, Value};
//!
//! let mut universe = TypeUniverse::new();
//! universe.insert(ClassInfo::bean("example.Tag").with_field(FieldInfo::new("value", TypeRef::string())));
//! let tag = TypeRef::named("example.Tag");
//!
//! let output = Generator::new(&universe).generate(&[tag.clone()]);
//! let mut codecs = CodecSet::new(DescriptorModel::new(&universe));
//! codecs.extend(output.codecs);
//! codecs.link().unwrap();
//!
//! let value = Value::from(Instance::new("example.Tag").with("value", "gif"));
//! let mut buffer = TokenBuffer::new();
//! codecs.encode(&tag, &value, &mut buffer).unwrap();
//!
//! let decoded = codecs.decode_document(&tag, &mut buffer.into_cursor()).unwrap();
//! assert_eq!(decoded, value);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod codec_set;
mod host;
mod machine;

// -----------------------------------------------------------------------------
// Exports

pub use codec_set::{CodecSet, ExternalCodec, LinkageError};
pub use host::DescriptorModel;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{CodecSet, DescriptorModel, ExternalCodec, LinkageError};
    use crate::Generator;
    use crate::info::{Annotation, ClassInfo, CreatorMode, EnumConstant, FieldInfo, MethodInfo};
    use crate::info::{ParamInfo, Primitive, TypeRef, TypeUniverse};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use jg_runtime::token::{Token, TokenBuffer, TokenCursor, TokenReader, TokenWriter};
    use jg_runtime::{DecodeError, EncodeError, Instance, Value};

    fn codecs<'u>(universe: &'u TypeUniverse, roots: &[TypeRef]) -> CodecSet<DescriptorModel<'u>> {
        let output = Generator::new(universe).generate(roots);
        assert!(!output.diagnostics.is_failed(), "{:?}", output.diagnostics);
        let mut set = CodecSet::new(DescriptorModel::new(universe));
        set.extend(output.codecs);
        set.link().unwrap();
        set
    }

    fn encode_json(set: &CodecSet<DescriptorModel<'_>>, ty: &TypeRef, value: &Value) -> String {
        let mut buffer = TokenBuffer::new();
        set.encode(ty, value, &mut buffer).unwrap();
        serde_json::to_string(&buffer.as_tree()).unwrap()
    }

    fn decode_json(
        set: &CodecSet<DescriptorModel<'_>>,
        ty: &TypeRef,
        json: &str,
    ) -> Result<Value, DecodeError> {
        let buffer: TokenBuffer = serde_json::from_str(json).unwrap();
        set.decode_document(ty, &mut buffer.into_cursor())
    }

    fn tag_class() -> ClassInfo {
        ClassInfo::bean("example.Tag").with_field(FieldInfo::new("value", TypeRef::string()))
    }

    fn tag(value: &str) -> Value {
        Instance::new("example.Tag").with("value", value).into()
    }

    #[test]
    fn image_round_trips_through_json() {
        let mut universe = TypeUniverse::new();
        universe.insert(tag_class());
        universe.insert(
            ClassInfo::bean("example.Image")
                .with_field(FieldInfo::new("id", TypeRef::primitive(Primitive::Int)))
                .with_field(FieldInfo::new("uri", TypeRef::string()))
                .with_field(FieldInfo::new(
                    "tags",
                    TypeRef::list_of(TypeRef::named("example.Tag")),
                )),
        );
        let image_ty = TypeRef::named("example.Image");
        let set = codecs(&universe, &[image_ty.clone()]);

        let image: Value = Instance::new("example.Image")
            .with("id", 123)
            .with("uri", "https://x")
            .with("tags", vec![tag("popcorn"), tag("gif")])
            .into();

        let json = encode_json(&set, &image_ty, &image);
        assert_eq!(
            json,
            r#"{"id":123,"uri":"https://x","tags":[{"value":"popcorn"},{"value":"gif"}]}"#
        );
        assert_eq!(decode_json(&set, &image_ty, &json), Ok(image));
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let mut universe = TypeUniverse::new();
        universe.insert(tag_class());
        let ty = TypeRef::named("example.Tag");
        let set = codecs(&universe, &[ty.clone()]);

        let error = decode_json(&set, &ty, r#"{"value":"a","value":"b"}"#).unwrap_err();
        assert!(
            matches!(&error, DecodeError::DuplicateProperty { name, .. } if name == "value"),
            "{error}"
        );
        assert_eq!(error.location().map(|location| location.index), Some(3));
    }

    #[test]
    fn unknown_fields_follow_the_type_policy() {
        let mut universe = TypeUniverse::new();
        universe.insert(tag_class());
        universe.insert(
            ClassInfo::bean("example.Lenient")
                .with_field(FieldInfo::new("value", TypeRef::string()))
                .annotate(Annotation::IgnoreUnknown(true)),
        );
        let strict = TypeRef::named("example.Tag");
        let lenient = TypeRef::named("example.Lenient");
        let set = codecs(&universe, &[strict.clone(), lenient.clone()]);

        let json = r#"{"extra":[1,{"deep":null}],"value":"kept","more":2}"#;
        assert!(matches!(
            decode_json(&set, &strict, json),
            Err(DecodeError::UnknownProperty { name, .. }) if name == "extra"
        ));
        assert_eq!(
            decode_json(&set, &lenient, json),
            Ok(Instance::new("example.Lenient").with("value", "kept").into())
        );
    }

    #[test]
    fn aliases_populate_the_same_property() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("example.Tag").with_field(
            FieldInfo::new("value", TypeRef::string())
                .annotate(Annotation::Alias(vec![String::from("label"), String::from("name")])),
        ));
        let ty = TypeRef::named("example.Tag");
        let set = codecs(&universe, &[ty.clone()]);

        for json in [r#"{"value":"x"}"#, r#"{"label":"x"}"#, r#"{"name":"x"}"#] {
            assert_eq!(decode_json(&set, &ty, json), Ok(tag("x")));
        }
        assert!(matches!(
            decode_json(&set, &ty, r#"{"value":"x","label":"y"}"#),
            Err(DecodeError::DuplicateProperty { .. })
        ));
        // Aliases are accepted, never written.
        assert_eq!(encode_json(&set, &ty, &tag("x")), r#"{"value":"x"}"#);
    }

    #[test]
    fn missing_creator_arguments_are_reported() {
        let int = || TypeRef::primitive(Primitive::Int);
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Point")
                .with_field(FieldInfo::new("x", int()).immutable())
                .with_field(FieldInfo::new("y", int()).immutable())
                .with_constructor(
                    MethodInfo::constructor(vec![
                        ParamInfo::new("x", int()).annotate(Annotation::Property(Some("x".into()))),
                        ParamInfo::new("y", int()).annotate(Annotation::Property(Some("y".into()))),
                    ])
                    .annotate(Annotation::Creator(CreatorMode::Default)),
                ),
        );
        let ty = TypeRef::named("example.Point");
        let set = codecs(&universe, &[ty.clone()]);

        let point: Value = Instance::new("example.Point").with("x", 1).with("y", -2).into();
        let json = encode_json(&set, &ty, &point);
        assert_eq!(json, r#"{"x":1,"y":-2}"#);
        assert_eq!(decode_json(&set, &ty, r#"{"y":-2,"x":1}"#), Ok(point));

        assert!(matches!(
            decode_json(&set, &ty, r#"{"x":1}"#),
            Err(DecodeError::MissingProperty { name, .. }) if name == "y"
        ));
    }

    #[test]
    fn unwrapped_properties_are_flattened() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Address")
                .with_field(FieldInfo::new("city", TypeRef::string()))
                .with_field(FieldInfo::new("zip", TypeRef::string())),
        );
        universe.insert(
            ClassInfo::bean("example.Person")
                .with_field(FieldInfo::new("name", TypeRef::string()))
                .with_field(
                    FieldInfo::new("address", TypeRef::named("example.Address"))
                        .annotate(Annotation::Unwrapped),
                ),
        );
        let ty = TypeRef::named("example.Person");
        let set = codecs(&universe, &[ty.clone()]);

        let address = Instance::new("example.Address")
            .with("city", "Oslo")
            .with("zip", "0150");
        let person: Value = Instance::new("example.Person")
            .with("name", "Ada")
            .with("address", address)
            .into();

        let json = encode_json(&set, &ty, &person);
        assert_eq!(json, r#"{"name":"Ada","city":"Oslo","zip":"0150"}"#);
        assert_eq!(decode_json(&set, &ty, r#"{"zip":"0150","name":"Ada","city":"Oslo"}"#), Ok(person));
    }

    #[test]
    fn unwrapped_type_may_also_appear_as_a_plain_property() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Address").with_field(FieldInfo::new("city", TypeRef::string())),
        );
        universe.insert(
            ClassInfo::bean("example.Person")
                .with_field(
                    FieldInfo::new("home", TypeRef::named("example.Address"))
                        .annotate(Annotation::Unwrapped),
                )
                .with_field(FieldInfo::new("work", TypeRef::named("example.Address"))),
        );
        let ty = TypeRef::named("example.Person");
        let set = codecs(&universe, &[ty.clone()]);

        let address = |city: &str| Instance::new("example.Address").with("city", city);
        let person: Value = Instance::new("example.Person")
            .with("home", address("Oslo"))
            .with("work", address("Bergen"))
            .into();

        let json = encode_json(&set, &ty, &person);
        assert_eq!(json, r#"{"city":"Oslo","work":{"city":"Bergen"}}"#);
        assert_eq!(decode_json(&set, &ty, &json), Ok(person));
    }

    #[test]
    fn recursive_chains_use_the_lazy_codec() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Node")
                .with_field(FieldInfo::new("label", TypeRef::string()))
                .with_field(
                    FieldInfo::new("next", TypeRef::named("example.Node"))
                        .annotate(Annotation::Recursive)
                        .annotate(Annotation::Nullable),
                ),
        );
        let ty = TypeRef::named("example.Node");
        let set = codecs(&universe, &[ty.clone()]);
        assert!(set.generated(&ty).unwrap().injections[0].lazy);

        let last = Instance::new("example.Node")
            .with("label", "b")
            .with("next", Value::Null);
        let first: Value = Instance::new("example.Node")
            .with("label", "a")
            .with("next", last)
            .into();

        let json = encode_json(&set, &ty, &first);
        assert_eq!(json, r#"{"label":"a","next":{"label":"b","next":null}}"#);
        assert_eq!(decode_json(&set, &ty, &json), Ok(first));
    }

    #[test]
    fn floats_outside_long_range_are_rejected() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Counter")
                .with_field(FieldInfo::new("v", TypeRef::primitive(Primitive::Long))),
        );
        let ty = TypeRef::named("example.Counter");
        let set = codecs(&universe, &[ty.clone()]);

        assert!(matches!(
            decode_json(&set, &ty, r#"{"v":9223372036854775808.0}"#),
            Err(DecodeError::InvalidNumber { target: "long", .. })
        ));
        assert!(matches!(
            decode_json(&set, &ty, r#"{"v":-1e19}"#),
            Err(DecodeError::InvalidNumber { target: "long", .. })
        ));
        assert_eq!(
            decode_json(&set, &ty, r#"{"v":-9223372036854775808.0}"#),
            Ok(Instance::new("example.Counter").with("v", i64::MIN).into())
        );
    }

    #[test]
    fn enums_and_number_ranges() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::enumeration(
            "example.Color",
            vec![
                EnumConstant::new("RED"),
                EnumConstant::new("DARK_BLUE").annotate(Annotation::Property(Some("dark-blue".into()))),
            ],
        ));
        universe.insert(
            ClassInfo::bean("example.Swatch")
                .with_field(FieldInfo::new("color", TypeRef::named("example.Color")))
                .with_field(FieldInfo::new("level", TypeRef::primitive(Primitive::Byte)))
                .with_field(FieldInfo::new("weight", TypeRef::primitive(Primitive::Double))),
        );
        let ty = TypeRef::named("example.Swatch");
        let set = codecs(&universe, &[ty.clone()]);

        let swatch: Value = Instance::new("example.Swatch")
            .with("color", Value::constant("DARK_BLUE"))
            .with("level", 2)
            .with("weight", 0.5)
            .into();
        let json = encode_json(&set, &ty, &swatch);
        assert_eq!(json, r#"{"color":"dark-blue","level":2,"weight":0.5}"#);

        let integral_float = r#"{"color":"dark-blue","level":2.0,"weight":0.5}"#;
        assert_eq!(decode_json(&set, &ty, integral_float), Ok(swatch));

        assert!(matches!(
            decode_json(&set, &ty, r#"{"color":"dark-blue","level":300,"weight":1}"#),
            Err(DecodeError::InvalidNumber { target: "byte", .. })
        ));
        assert!(matches!(
            decode_json(&set, &ty, r#"{"color":"dark-blue","level":1.5,"weight":1}"#),
            Err(DecodeError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_json(&set, &ty, r#"{"color":"green","level":1,"weight":1}"#),
            Err(DecodeError::UnknownEnumLiteral { literal, .. }) if literal == "green"
        ));

        let unknown: Value = Instance::new("example.Swatch")
            .with("color", Value::constant("GREEN"))
            .with("level", 1)
            .with("weight", 1.0)
            .into();
        let mut buffer = TokenBuffer::new();
        assert!(matches!(
            set.encode(&ty, &unknown, &mut buffer),
            Err(EncodeError::UnknownEnumConstant { .. })
        ));
    }

    #[test]
    fn malformed_streams() {
        let mut universe = TypeUniverse::new();
        universe.insert(tag_class());
        let ty = TypeRef::named("example.Tag");
        let set = codecs(&universe, &[ty.clone()]);

        assert!(matches!(
            decode_json(&set, &ty, "[]"),
            Err(DecodeError::UnexpectedToken { expected: "begin-object", .. })
        ));
        assert!(matches!(
            decode_json(&set, &ty, r#"{"value":1}"#),
            Err(DecodeError::UnexpectedToken { expected: "string", .. })
        ));

        let mut cursor = TokenCursor::new(vec![
            Token::BeginObject,
            Token::FieldName("value".into()),
            Token::Str("a".into()),
        ]);
        assert!(matches!(
            set.decode(&ty, &mut cursor),
            Err(DecodeError::UnexpectedToken { .. } | DecodeError::UnexpectedEnd { .. })
        ));

        let mut cursor = TokenCursor::new(vec![
            Token::BeginObject,
            Token::EndObject,
            Token::Null,
        ]);
        assert_eq!(
            set.decode_document(&ty, &mut cursor),
            Err(DecodeError::TrailingTokens {
                location: jg_runtime::token::Location::new(2),
            })
        );
    }

    struct EpochCodec;

    impl ExternalCodec for EpochCodec {
        fn encode(&self, value: &Value, writer: &mut dyn TokenWriter) -> Result<(), EncodeError> {
            match value {
                Value::Int(seconds) => writer.write_int(*seconds),
                other => Err(EncodeError::UnexpectedValue {
                    expected: "integer",
                    found: other.kind_name(),
                }),
            }
        }

        fn decode(&self, reader: &mut dyn TokenReader) -> Result<Value, DecodeError> {
            match reader.current() {
                Some(Token::Int(seconds)) => {
                    let seconds = *seconds;
                    reader.advance();
                    Ok(Value::Int(seconds))
                }
                _ => Err(reader.unexpected("integer")),
            }
        }
    }

    #[test]
    fn external_codecs_are_linked_eagerly() {
        let mut universe = TypeUniverse::new();
        universe.mark_external("example.Instant");
        universe.insert(
            ClassInfo::bean("example.Event")
                .with_field(FieldInfo::new("at", TypeRef::named("example.Instant"))),
        );
        let ty = TypeRef::named("example.Event");

        let output = Generator::new(&universe).generate(&[ty.clone()]);
        assert_eq!(output.codecs.len(), 1);
        let mut set = CodecSet::new(DescriptorModel::new(&universe));
        set.extend(output.codecs);
        assert_eq!(
            set.link(),
            Err(LinkageError::MissingInjection {
                codec: "example.Event$Codec".into(),
                field: "instantCodec".into(),
                target: TypeRef::named("example.Instant"),
            })
        );

        set.insert_external(TypeRef::named("example.Instant"), EpochCodec);
        set.link().unwrap();

        let event: Value = Instance::new("example.Event").with("at", 1_700_000_000i64).into();
        let mut buffer = TokenBuffer::new();
        set.encode(&ty, &event, &mut buffer).unwrap();
        let tokens: Vec<Token> = buffer.tokens().to_vec();
        assert_eq!(tokens[2], Token::Int(1_700_000_000));
        assert_eq!(set.decode_document(&ty, &mut buffer.into_cursor()), Ok(event));
    }
}
