use alloc::string::String;

/// Options of a [`Generator`](crate::Generator).
///
/// ```
/// use jg_codegen::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// assert_eq!(config.codec_suffix, "$Codec");
/// assert!(!config.deny_warnings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Appended to the qualified type path to name a codec.
    pub codec_suffix: String,
    /// Treat warnings as failures.
    pub deny_warnings: bool,
}

impl GeneratorConfig {
    pub const DEFAULT_SUFFIX: &'static str = "$Codec";

    #[inline]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.codec_suffix = suffix.into();
        self
    }

    #[inline]
    pub fn deny_warnings(mut self, deny: bool) -> Self {
        self.deny_warnings = deny;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            codec_suffix: String::from(Self::DEFAULT_SUFFIX),
            deny_warnings: false,
        }
    }
}
