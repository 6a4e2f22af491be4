//! Identifier sanitization for generated output.
//!
//! Node and application display names are free text ("Page 1", "My App!"),
//! but page functions, the root function, and the primary artifact name must
//! be valid JavaScript identifiers. `sanitize_identifier` is pure and total:
//! the same name always maps to the same identifier within a generation run.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_IDENTIFIER: Regex = Regex::new(r"[^A-Za-z0-9_$]").unwrap();
    static ref LEADING_DIGIT: Regex = Regex::new(r"^[0-9]").unwrap();
}

/// Strip whitespace and any other non-identifier characters, escaping a
/// leading digit with an underscore. Names that sanitize to nothing at all
/// become a single underscore so the result is always a usable identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let cleaned = NON_IDENTIFIER.replace_all(name, "");
    if cleaned.is_empty() {
        return "_".to_string();
    }
    if LEADING_DIGIT.is_match(&cleaned) {
        format!("_{}", cleaned)
    } else {
        cleaned.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace() {
        assert_eq!(sanitize_identifier("Page 1"), "Page1");
        assert_eq!(sanitize_identifier("My  App"), "MyApp");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(sanitize_identifier("My App!"), "MyApp");
        assert_eq!(sanitize_identifier("a-b.c"), "abc");
    }

    #[test]
    fn escapes_leading_digit() {
        assert_eq!(sanitize_identifier("1st Page"), "_1stPage");
    }

    #[test]
    fn keeps_valid_identifiers_untouched() {
        assert_eq!(sanitize_identifier("test1"), "test1");
        assert_eq!(sanitize_identifier("_private$"), "_private$");
    }

    #[test]
    fn empty_and_symbol_only_names_become_underscore() {
        assert_eq!(sanitize_identifier(""), "_");
        assert_eq!(sanitize_identifier("!!!"), "_");
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(sanitize_identifier("Page 1"), sanitize_identifier("Page 1"));
    }
}
