use alloc::format;
use alloc::string::String;

use jg_utils::hash::HashSet;

/// Words a generated identifier must not spell.
const RESERVED: &[&str] = &[
    "as", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "false", "final", "float", "fn", "for",
    "if", "impl", "import", "in", "int", "let", "long", "loop", "match", "mod", "mut", "new",
    "null", "package", "pub", "ref", "return", "self", "short", "static", "struct", "super",
    "switch", "this", "throw", "trait", "true", "try", "type", "use", "void", "where", "while",
];

/// Turns a name hint into a legal identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`, a leading digit gets a `_`
/// prefix, and reserved words get a `_` suffix.
///
/// ```
/// use jg_codegen::scope::sanitize;
///
/// assert_eq!(sanitize("tags"), "tags");
/// assert_eq!(sanitize("List<Tag>"), "List_Tag_");
/// assert_eq!(sanitize("2d"), "_2d");
/// assert_eq!(sanitize("class"), "class_");
/// assert_eq!(sanitize(""), "_");
/// ```
pub fn sanitize(hint: &str) -> String {
    let mut name = String::with_capacity(hint.len() + 1);
    for ch in hint.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            name.push(ch);
        } else {
            name.push('_');
        }
    }

    match name.chars().next() {
        None => name.push('_'),
        Some(first) if first.is_ascii_digit() => name.insert(0, '_'),
        _ => {}
    }

    if RESERVED.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

// -----------------------------------------------------------------------------
// NameScope

/// The set of identifiers already used in one lexical scope.
///
/// # Examples
///
/// ```
/// use jg_codegen::scope::NameScope;
///
/// let mut scope = NameScope::with_reserved(&["decoder"]);
/// assert_eq!(scope.claim("object"), "object");
/// assert_eq!(scope.claim("object"), "object1");
/// assert_eq!(scope.claim("decoder"), "decoder1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    used: HashSet<String>,
}

impl NameScope {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope in which `names` are taken already, such as method
    /// parameters.
    pub fn with_reserved(names: &[&str]) -> Self {
        let mut scope = Self::new();
        for name in names {
            scope.used.insert(sanitize(name));
        }
        scope
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns a fresh identifier derived from `hint` and marks it used.
    ///
    /// On collision a numeric suffix is appended, counting up from 1.
    pub fn claim(&mut self, hint: &str) -> String {
        let base = sanitize(hint);
        if !self.used.contains(&base) {
            self.used.insert(base.clone());
            return base;
        }

        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            suffix += 1;
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{NameScope, sanitize};

    #[test]
    fn suffix_skips_taken_names() {
        let mut scope = NameScope::new();
        assert_eq!(scope.claim("value1"), "value1");
        assert_eq!(scope.claim("value"), "value");
        assert_eq!(scope.claim("value"), "value2");
        assert_eq!(scope.len(), 3);
    }

    #[test]
    fn sanitized_collisions() {
        let mut scope = NameScope::new();
        assert_eq!(scope.claim("a-b"), "a_b");
        assert_eq!(scope.claim("a.b"), "a_b1");
        assert!(scope.contains("a_b1"));
    }

    #[test]
    fn reserved_words() {
        assert_eq!(sanitize("new"), "new_");
        assert_eq!(sanitize("newer"), "newer");
        let mut scope = NameScope::with_reserved(&["this"]);
        assert_eq!(scope.claim("this"), "this_1");
    }
}
