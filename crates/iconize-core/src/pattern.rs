//! Rule pattern compilation.
//!
//! A rule pattern is tried as a regular expression first. Patterns that do
//! not compile (a file name such as `notes(1).md` typed verbatim, say) are
//! kept as literal text and matched by substring containment instead. The
//! fallback is silent: a malformed regex is ordinary user input, not an error.

use std::fmt;

use regex::Regex;

/// A rule pattern, compiled once and reused for every name it is tested against.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Pattern compiled as a regular expression (unanchored search).
    Regex(Regex),
    /// Pattern that failed to compile; matched as a substring.
    Literal(String),
}

impl CompiledPattern {
    /// Compile `pattern`, falling back to a literal matcher on syntax errors.
    pub fn compile(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Self::Regex(regex),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "pattern is not a valid regex, matching literally");
                Self::Literal(pattern.to_string())
            }
        }
    }

    /// Test a basename against this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(name),
            Self::Literal(literal) => name.contains(literal.as_str()),
        }
    }

    /// The pattern source text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Regex(regex) => regex.as_str(),
            Self::Literal(literal) => literal,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex(_))
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex(regex) => write!(f, "/{}/", regex.as_str()),
            Self::Literal(literal) => write!(f, "\"{}\"", literal),
        }
    }
}

/// Compile `pattern` and test `name` against it in one step.
///
/// Prefer [`CompiledPattern::compile`] when the same pattern is tested
/// against many names.
pub fn compile_and_test(pattern: &str, name: &str) -> bool {
    CompiledPattern::compile(pattern).matches(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_regex_is_compiled() {
        let pattern = CompiledPattern::compile(r"^\d{4}-\d{2}-\d{2}\.md$");
        assert!(pattern.is_regex());
        assert!(pattern.matches("2024-01-31.md"));
        assert!(!pattern.matches("notes-2024-01-31.md"));
    }

    #[test]
    fn test_regex_is_unanchored_search() {
        assert!(compile_and_test("draft", "my-draft-notes.md"));
        assert!(compile_and_test("^draft", "draft-notes.md"));
        assert!(!compile_and_test("^draft", "my-draft-notes.md"));
    }

    #[test]
    fn test_malformed_regex_falls_back_to_literal() {
        let pattern = CompiledPattern::compile("notes(1");
        assert!(!pattern.is_regex());
        assert!(pattern.matches("my notes(1).md"));
        assert!(!pattern.matches("my notes 1.md"));
    }

    #[test]
    fn test_literal_fallback_unclosed_class() {
        assert!(compile_and_test("file[1", "old file[1].txt"));
        assert!(!compile_and_test("file[1", "file1.txt"));
    }

    #[test]
    fn test_regex_metacharacters_are_not_literal_when_valid() {
        // `a.c` is a valid regex, so `.` matches any character
        assert!(compile_and_test("a.c", "abc"));
        assert!(compile_and_test("a.c", "a.c"));
    }

    #[test]
    fn test_as_str_and_display() {
        let regex = CompiledPattern::compile("^img");
        assert_eq!(regex.as_str(), "^img");
        assert_eq!(regex.to_string(), "/^img/");

        let literal = CompiledPattern::compile("(img");
        assert_eq!(literal.as_str(), "(img");
        assert_eq!(literal.to_string(), "\"(img\"");
    }
}
