use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::mem;

use jg_utils::hash::HashSet;

use crate::check::DependencyChecker;
use crate::config::GeneratorConfig;
use crate::diag::Diagnostics;
use crate::info::{ClassKind, TypeRef, TypeUniverse};
use crate::plan::{DecodeMethod, EncodeMethod, Injection};
use crate::registry::CodecRegistry;
use crate::synth::{SynthContext, decode_bean, encode_bean};

// -----------------------------------------------------------------------------
// GeneratedCodec

/// The synthesized codec of one bean type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCodec {
    /// Qualified codec name, unique within one generation run.
    pub name: String,
    pub value_type: TypeRef,
    pub encode: EncodeMethod,
    pub decode: DecodeMethod,
    /// Delegate codecs the generated codec holds.
    pub injections: Vec<Injection>,
}

/// Everything one [`Generator::generate`] call produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub codecs: Vec<GeneratedCodec>,
    pub diagnostics: Diagnostics,
}

impl GenerationOutput {
    /// The codec generated for `ty`, if any.
    pub fn codec(&self, ty: &TypeRef) -> Option<&GeneratedCodec> {
        self.codecs.iter().find(|codec| codec.value_type == *ty)
    }
}

// -----------------------------------------------------------------------------
// Generator

/// Generates codecs for root bean types and for every bean their codecs
/// inject.
///
/// A failure abandons only the codec of the affected type. All problems of a
/// run are collected in [`GenerationOutput::diagnostics`].
///
/// # Examples
///
/// ```
/// use jg_codegen::Generator;
/// use jg_codegen::info::{ClassInfo, FieldInfo, TypeRef, TypeUniverse};
///
/// let mut universe = TypeUniverse::new();
/// universe.insert(ClassInfo::bean("example.Tag").with_field(FieldInfo::new("value", TypeRef::string())));
///
/// let mut generator = Generator::new(&universe);
/// let output = generator.generate(&[TypeRef::named("example.Tag")]);
/// assert!(output.diagnostics.is_empty());
/// assert_eq!(output.codecs[0].name, "example.Tag$Codec");
/// ```
#[derive(Debug)]
pub struct Generator<'u> {
    universe: &'u TypeUniverse,
    registry: CodecRegistry,
    config: GeneratorConfig,
    names: HashSet<String>,
}

impl<'u> Generator<'u> {
    #[inline]
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self::with_config(universe, GeneratorConfig::default())
    }

    pub fn with_config(universe: &'u TypeUniverse, config: GeneratorConfig) -> Self {
        Self {
            universe,
            registry: CodecRegistry::new(),
            config,
            names: HashSet::default(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&mut self, roots: &[TypeRef]) -> GenerationOutput {
        for root in roots {
            self.registry.prepend_generated(root.clone());
        }

        let mut output = GenerationOutput {
            codecs: Vec::new(),
            diagnostics: self.diagnostics(),
        };
        let mut queue: VecDeque<TypeRef> = roots.iter().cloned().collect();
        let mut visited: Vec<TypeRef> = Vec::new();

        while let Some(ty) = queue.pop_front() {
            if visited.contains(&ty) {
                continue;
            }
            visited.push(ty.clone());

            let mut diagnostics = self.diagnostics();
            match self.generate_codec(&ty, &mut diagnostics) {
                Some(codec) => {
                    log::debug!("generated `{}` for `{ty}`", codec.name);
                    for injection in &codec.injections {
                        if self.needs_codec(&injection.target) {
                            self.registry.prepend_generated(injection.target.clone());
                            queue.push_back(injection.target.clone());
                        }
                    }
                    output.codecs.push(codec);
                }
                None => log::warn!("abandoned the codec of `{ty}`"),
            }
            output.diagnostics.append(&mut diagnostics);
        }

        output
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new().deny_warnings(self.config.deny_warnings)
    }

    /// Injected beans without a host-supplied codec get a generated one.
    fn needs_codec(&self, ty: &TypeRef) -> bool {
        let Some(class) = self.universe.resolve(ty) else {
            return false;
        };
        matches!(class.kind(), ClassKind::Bean) && !self.universe.is_external(class.path())
    }

    fn generate_codec(
        &mut self,
        ty: &TypeRef,
        diagnostics: &mut Diagnostics,
    ) -> Option<GeneratedCodec> {
        let element = ty.to_string();
        match self.universe.resolve(ty).map(|class| class.kind()) {
            Some(ClassKind::Bean) => {}
            Some(ClassKind::Enum(_)) | None => {
                diagnostics.fail(
                    format!("cannot generate a codec for `{ty}`: not a bean"),
                    Some(&element),
                );
                return None;
            }
        }

        if !DependencyChecker::new(self.universe, &self.registry).check(ty, diagnostics) {
            return None;
        }

        let mut cx = SynthContext::new(self.universe, &self.registry, mem::take(diagnostics));
        cx.enter(ty.simple_name());

        cx.begin_method(&["value", "encoder"]);
        let encode = encode_bean(&mut cx, ty);
        let encode_locals = cx.end_method();

        cx.begin_method(&["decoder"]);
        let decode = decode_bean(&mut cx, ty);
        let decode_locals = cx.end_method();

        cx.leave();
        let (synthesized, injections) = cx.finish();
        *diagnostics = synthesized;
        let (Some(encode), Some(decode)) = (encode, decode) else {
            return None;
        };
        if diagnostics.is_failed() {
            return None;
        }

        Some(GeneratedCodec {
            name: self.codec_name(ty),
            value_type: ty.clone(),
            encode: EncodeMethod {
                locals: encode_locals,
                body: encode,
            },
            decode: DecodeMethod {
                locals: decode_locals,
                body: decode,
            },
            injections,
        })
    }

    /// `<path>[_<Arg>...]<suffix>`, made unique with a counter.
    fn codec_name(&mut self, ty: &TypeRef) -> String {
        let mut base = String::from(ty.path().unwrap_or_default());
        for arg in ty.args() {
            base.push('_');
            base.push_str(&arg.simple_name());
        }

        let mut name = format!("{base}{}", self.config.codec_suffix);
        let mut counter = 1usize;
        while self.names.contains(&name) {
            counter += 1;
            name = format!("{base}{counter}{}", self.config.codec_suffix);
        }
        self.names.insert(name.clone());
        name
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Generator;
    use crate::GeneratorConfig;
    use crate::diag::Severity;
    use crate::info::{Annotation, ClassInfo, CreatorMode, FieldInfo, MethodInfo, ParamInfo};
    use crate::info::Primitive;
    use crate::info::{TypeRef, TypeUniverse};
    use crate::plan::{DecodeOp, EncodeOp, EncodeProperty};
    use alloc::string::String;
    use alloc::vec;

    fn tag_and_image() -> TypeUniverse {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Tag").with_field(FieldInfo::new("value", TypeRef::string())),
        );
        universe.insert(
            ClassInfo::bean("example.Image")
                .with_field(FieldInfo::new("id", TypeRef::primitive(Primitive::Int)))
                .with_field(FieldInfo::new("uri", TypeRef::string()))
                .with_field(FieldInfo::new(
                    "tags",
                    TypeRef::list_of(TypeRef::named("example.Tag")),
                )),
        );
        universe
    }

    #[test]
    fn nested_beans_are_inlined() {
        let universe = tag_and_image();
        let mut generator = Generator::new(&universe);
        let output = generator.generate(&[TypeRef::named("example.Image")]);

        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        assert_eq!(output.codecs.len(), 1);
        let codec = &output.codecs[0];
        assert_eq!(codec.name, "example.Image$Codec");
        assert!(codec.injections.is_empty());

        let EncodeOp::Object { properties, .. } = &codec.encode.body else {
            panic!("expected an object encoder");
        };
        let names: vec::Vec<_> = properties
            .iter()
            .map(|property| match property {
                EncodeProperty::Field { name, .. } => name.as_str(),
                EncodeProperty::Unwrapped { .. } => "<unwrapped>",
            })
            .collect();
        assert_eq!(names, ["id", "uri", "tags"]);

        let DecodeOp::Object(decoder) = &codec.decode.body else {
            panic!("expected an object decoder");
        };
        assert_eq!(decoder.leaves.len(), 3);
        assert_eq!(decoder.dispatch.get("uri"), Some(&1));
        assert!(matches!(decoder.leaves[2].value, DecodeOp::Sequence { .. }));
        // `decoder` is a parameter; locals never shadow it.
        assert!(!codec.decode.locals.iter().any(|local| local == "decoder"));
    }

    #[test]
    fn recursive_self_reference_uses_a_lazy_injection() {
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
        universe.insert(ClassInfo::bean("example.Graph").with_field(FieldInfo::new(
            "head",
            TypeRef::named("example.Node"),
        )));

        let mut generator = Generator::new(&universe);
        let output = generator.generate(&[TypeRef::named("example.Graph")]);

        assert!(!output.diagnostics.is_failed(), "{:?}", output.diagnostics);
        assert_eq!(output.codecs.len(), 2);
        let graph = output.codec(&TypeRef::named("example.Graph")).unwrap();
        assert_eq!(graph.injections.len(), 1);
        assert_eq!(graph.injections[0].field, "nodeProvider");
        assert!(graph.injections[0].lazy);

        let node = output.codec(&TypeRef::named("example.Node")).unwrap();
        assert_eq!(node.name, "example.Node$Codec");
        assert!(node.injections[0].lazy);
        assert!(generator.registry().is_generated(&TypeRef::named("example.Node")));
    }

    #[test]
    fn cycles_abandon_only_the_affected_type() {
        let mut universe = tag_and_image();
        universe.insert(ClassInfo::bean("example.Loop").with_field(FieldInfo::new(
            "again",
            TypeRef::named("example.Loop"),
        )));

        let mut generator = Generator::new(&universe);
        let output = generator.generate(&[
            TypeRef::named("example.Loop"),
            TypeRef::named("example.Tag"),
        ]);

        assert_eq!(output.codecs.len(), 1);
        assert_eq!(output.codecs[0].value_type, TypeRef::named("example.Tag"));
        assert!(output.diagnostics.is_failed());
        assert!(
            output
                .diagnostics
                .failures()
                .all(|problem| problem.message.contains("Loop->again"))
        );
    }

    #[test]
    fn creator_bound_properties_are_constructor_arguments() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Point")
                .with_field(FieldInfo::new("x", TypeRef::primitive(Primitive::Int)).private())
                .with_field(FieldInfo::new("y", TypeRef::primitive(Primitive::Int)).private())
                .with_method(MethodInfo::getter("getX", TypeRef::primitive(Primitive::Int)))
                .with_method(MethodInfo::getter("getY", TypeRef::primitive(Primitive::Int)))
                .with_constructor(MethodInfo::constructor(vec![
                    ParamInfo::new("x", TypeRef::primitive(Primitive::Int))
                        .annotate(Annotation::Property(Some(String::from("x")))),
                    ParamInfo::new("y", TypeRef::primitive(Primitive::Int))
                        .annotate(Annotation::Property(Some(String::from("y")))),
                ])
                .annotate(Annotation::Creator(CreatorMode::Default))),
        );

        let mut generator = Generator::new(&universe);
        let output = generator.generate(&[TypeRef::named("example.Point")]);
        assert!(!output.diagnostics.is_failed(), "{:?}", output.diagnostics);

        let DecodeOp::Object(decoder) = &output.codecs[0].decode.body else {
            panic!("expected an object decoder");
        };
        assert_eq!(decoder.assembly.arguments.len(), 2);
        assert!(decoder.assembly.apply.is_empty());
    }

    #[test]
    fn non_beans_and_custom_suffix() {
        let universe = tag_and_image();
        let config = GeneratorConfig::default().with_suffix("Codec");
        let mut generator = Generator::with_config(&universe, config);
        let output = generator.generate(&[
            TypeRef::string(),
            TypeRef::named("example.Tag"),
        ]);

        assert_eq!(output.codecs.len(), 1);
        assert_eq!(output.codecs[0].name, "example.TagCodec");
        assert_eq!(output.diagnostics.count(Severity::Fail), 1);
    }

    #[test]
    fn denied_warnings_abandon_the_codec() {
        let mut universe = TypeUniverse::new();
        universe.insert(ClassInfo::bean("example.Counter").with_field(
            FieldInfo::new("count", TypeRef::primitive(Primitive::Long)).annotate(Annotation::Nullable),
        ));
        let root = [TypeRef::named("example.Counter")];

        let output = Generator::new(&universe).generate(&root);
        assert_eq!(output.codecs.len(), 1);
        assert_eq!(output.diagnostics.count(Severity::Warn), 2);

        let config = GeneratorConfig::default().deny_warnings(true);
        let output = Generator::with_config(&universe, config).generate(&root);
        assert!(output.codecs.is_empty());
        assert!(output.diagnostics.is_failed());
    }

    #[test]
    fn aliases_clashing_with_names_abandon_the_codec() {
        let mut universe = TypeUniverse::new();
        universe.insert(
            ClassInfo::bean("example.Label")
                .with_field(FieldInfo::new("name", TypeRef::string()))
                .with_field(
                    FieldInfo::new("title", TypeRef::string())
                        .annotate(Annotation::Alias(vec![String::from("name")])),
                ),
        );

        let output = Generator::new(&universe).generate(&[TypeRef::named("example.Label")]);
        assert!(output.codecs.is_empty());
        let messages: vec::Vec<_> = output
            .diagnostics
            .failures()
            .map(|problem| problem.message.as_str())
            .collect();
        assert_eq!(messages.len(), 1, "{messages:?}");
        assert!(messages[0].contains("duplicate wire name `name`"), "{}", messages[0]);
        assert!(messages[0].contains("`name` and `title`"), "{}", messages[0]);
    }
}
