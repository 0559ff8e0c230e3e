use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Severity

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Fail,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Fail => "fail",
        })
    }
}

// -----------------------------------------------------------------------------
// Problem

/// One diagnostic, attached to the element it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub severity: Severity,
    pub message: String,
    pub element: Option<String>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(element) = &self.element {
            write!(f, " (at `{element}`)")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Diagnostics

/// Collects problems found while generating codecs.
///
/// Collection never stops early: any number of failures can be recorded,
/// and the result they concern is discarded once [`Diagnostics::is_failed`]
/// turns true.
///
/// # Examples
///
/// ```
/// use jg_codegen::{Diagnostics, Severity};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.warn("nullable has no effect on a primitive", Some("example.Image#id"));
/// assert!(!diagnostics.is_failed());
///
/// diagnostics.fail("multiple creators configured", Some("example.Image"));
/// assert!(diagnostics.is_failed());
/// assert_eq!(diagnostics.count(Severity::Fail), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    problems: Vec<Problem>,
    deny_warnings: bool,
}

impl Diagnostics {
    #[inline]
    pub const fn new() -> Self {
        Self {
            problems: Vec::new(),
            deny_warnings: false,
        }
    }

    /// Makes warnings count as failures.
    #[inline]
    pub const fn deny_warnings(mut self, deny: bool) -> Self {
        self.deny_warnings = deny;
        self
    }

    pub fn report(&mut self, severity: Severity, message: impl Into<String>, element: Option<&str>) {
        let problem = Problem {
            severity,
            message: message.into(),
            element: element.map(String::from),
        };
        log::trace!("{problem}");
        self.problems.push(problem);
    }

    #[inline]
    pub fn info(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.report(Severity::Info, message, element);
    }

    #[inline]
    pub fn warn(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.report(Severity::Warn, message, element);
    }

    #[inline]
    pub fn fail(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.report(Severity::Fail, message, element);
    }

    pub fn is_failed(&self) -> bool {
        self.problems.iter().any(|problem| match problem.severity {
            Severity::Fail => true,
            Severity::Warn => self.deny_warnings,
            Severity::Info => false,
        })
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.problems
            .iter()
            .filter(|problem| problem.severity == severity)
            .count()
    }

    #[inline]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Problems of severity `Fail`.
    pub fn failures(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .filter(|problem| problem.severity == Severity::Fail)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Moves every problem of `other` into `self`.
    #[inline]
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.problems.append(&mut other.problems);
    }

    #[inline]
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}
