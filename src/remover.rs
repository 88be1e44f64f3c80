//! Marker-block removal.
//!
//! By default a marker block runs from a `/**` opener, lazily through the
//! sentinel phrase, to the nearest `*/` after it. The span may cross earlier
//! closers: in `/** a */ code /** SENTINEL */` everything from the first
//! opener goes. `BlockScope::Comment` narrows a block to a single comment.
//!
//! This is a textual match, not a comment grammar: comment-like text inside
//! string or template literals is treated the same as a real comment.

use crate::patterns::BlockScope;
use regex::Regex;
use std::borrow::Cow;

/// Sentinel used by the built-in rules.
pub const DEFAULT_SENTINEL: &str = "GIẢI THÍCH CHO THỰC TẬP SINH";

// `/**/` is a complete comment and must not run on to a later closer.
const BLOCK_COMMENT: &str = r"(?s)/\*\*/|/\*\*.*?\*/";

/// Result of stripping one file's text
#[derive(Debug)]
pub struct Stripped<'a> {
    pub text: Cow<'a, str>,
    /// Number of marker blocks deleted
    pub removed: usize,
}

impl Stripped<'_> {
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

/// Compiled matcher for marker blocks
#[derive(Debug, Clone)]
pub struct MarkerRemover {
    block: Regex,
    /// Second check applied to each candidate block in `Comment` scope
    sentinel: Option<Regex>,
}

impl MarkerRemover {
    /// Build a remover for the given sentinel phrase using `BlockScope::Span`.
    ///
    /// The phrase is matched literally and case-sensitively. Word boundaries
    /// are required on each side where the phrase starts or ends with a word
    /// character, so `XGIẢI THÍCH ...` does not count.
    pub fn new(sentinel: &str) -> Result<Self, regex::Error> {
        Self::with_scope(sentinel, BlockScope::Span)
    }

    pub fn with_scope(sentinel: &str, scope: BlockScope) -> Result<Self, regex::Error> {
        let phrase = bounded_literal(sentinel);

        match scope {
            BlockScope::Span => Ok(Self {
                block: Regex::new(&format!(r"(?s)/\*\*.*?{}.*?\*/", phrase))?,
                sentinel: None,
            }),
            BlockScope::Comment => Ok(Self {
                block: Regex::new(BLOCK_COMMENT)?,
                sentinel: Some(Regex::new(&phrase)?),
            }),
        }
    }

    fn is_marker(&self, block: &str) -> bool {
        self.sentinel
            .as_ref()
            .map_or(true, |sentinel| sentinel.is_match(block))
    }

    /// Delete every marker block from `content` in a single left-to-right pass.
    pub fn strip<'a>(&self, content: &'a str) -> Stripped<'a> {
        let mut text = String::new();
        let mut last = 0;
        let mut removed = 0;

        for block in self.block.find_iter(content) {
            if !self.is_marker(block.as_str()) {
                continue;
            }
            text.push_str(&content[last..block.start()]);
            last = block.end();
            removed += 1;
        }

        if removed == 0 {
            return Stripped {
                text: Cow::Borrowed(content),
                removed,
            };
        }

        text.push_str(&content[last..]);
        Stripped {
            text: Cow::Owned(text),
            removed,
        }
    }

    /// True if `content` contains at least one marker block.
    pub fn has_marker(&self, content: &str) -> bool {
        self.block
            .find_iter(content)
            .any(|block| self.is_marker(block.as_str()))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn bounded_literal(phrase: &str) -> String {
    let mut pattern = String::new();
    if phrase.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if phrase.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remover() -> MarkerRemover {
        MarkerRemover::new(DEFAULT_SENTINEL).unwrap()
    }

    const HEADER: &str = "/**\n * ==========\n * USER SERVICE\n * ==========\n *\n * 📚 GIẢI THÍCH CHO THỰC TẬP SINH:\n *\n * Service này xử lý logic.\n */\n";

    #[test]
    fn test_removes_multiline_header() {
        let input = format!("{HEADER}import x from 'x';\n");
        let out = remover().strip(&input);
        assert!(out.changed());
        assert_eq!(out.removed, 1);
        assert_eq!(out.text, "\nimport x from 'x';\n");
    }

    #[test]
    fn test_nearest_closer_only() {
        let input = "/** A GIẢI THÍCH CHO THỰC TẬP SINH B */ code /** C */";
        let out = remover().strip(input);
        assert_eq!(out.text, " code /** C */");
        assert_eq!(out.removed, 1);
    }

    #[test]
    fn test_no_opener_is_noop() {
        let input = "const a = 1; // GIẢI THÍCH CHO THỰC TẬP SINH\n";
        let out = remover().strip(input);
        assert!(!out.changed());
        assert!(matches!(out.text, Cow::Borrowed(_)));
        assert_eq!(out.text, input);
    }

    #[test]
    fn test_block_without_sentinel_is_kept() {
        let input = "/**\n * Regular JSDoc.\n * @param a value\n */\nexport function f(a) {}\n";
        let out = remover().strip(input);
        assert!(!out.changed());
        assert_eq!(out.text, input);
    }

    #[test]
    fn test_unterminated_block_left_intact() {
        let input = "/** GIẢI THÍCH CHO THỰC TẬP SINH\nconst a = 1;\n";
        let out = remover().strip(input);
        assert!(!out.changed());
        assert_eq!(out.text, input);
    }

    fn comment_scoped() -> MarkerRemover {
        MarkerRemover::with_scope(DEFAULT_SENTINEL, BlockScope::Comment).unwrap()
    }

    #[test]
    fn test_removes_every_occurrence() {
        let input = "/** GIẢI THÍCH CHO THỰC TẬP SINH one */a/** GIẢI THÍCH CHO THỰC TẬP SINH two */b/** keep */c";
        let out = remover().strip(input);
        assert_eq!(out.removed, 2);
        assert_eq!(out.text, "ab/** keep */c");
    }

    #[test]
    fn test_span_reaches_back_to_earliest_opener() {
        let input = "/** intro */ code /** GIẢI THÍCH CHO THỰC TẬP SINH */ tail";
        let out = remover().strip(input);
        assert_eq!(out.removed, 1);
        assert_eq!(out.text, " tail");
    }

    #[test]
    fn test_span_ends_at_nearest_closer_after_sentinel() {
        let input = "a/** x */b/**\n * GIẢI THÍCH CHO THỰC TẬP SINH two\n */c/** y */";
        let out = remover().strip(input);
        assert_eq!(out.text, "ac/** y */");
    }

    #[test]
    fn test_comment_scope_keeps_earlier_comment() {
        let input = "/** intro */ code /** GIẢI THÍCH CHO THỰC TẬP SINH */ tail";
        let out = comment_scoped().strip(input);
        assert_eq!(out.text, "/** intro */ code  tail");
    }

    #[test]
    fn test_comment_scope_removes_every_occurrence() {
        let input = "/** GIẢI THÍCH CHO THỰC TẬP SINH one */a/** keep */b/**\n * GIẢI THÍCH CHO THỰC TẬP SINH two\n */c";
        let out = comment_scoped().strip(input);
        assert_eq!(out.removed, 2);
        assert_eq!(out.text, "a/** keep */bc");
    }

    #[test]
    fn test_comment_scope_empty_comment_does_not_swallow_code() {
        let input = "/**/ let x = 'GIẢI THÍCH CHO THỰC TẬP SINH'; /* end */";
        assert!(!comment_scoped().strip(input).changed());
        // The span pattern has no notion of `/**/`
        assert_eq!(remover().strip(input).text, "");
    }

    #[test]
    fn test_unterminated_block_left_intact_in_both_scopes() {
        let input = "/** done */ x /** GIẢI THÍCH CHO THỰC TẬP SINH\nconst a = 1;\n";
        assert!(!remover().strip(input).changed());
        assert!(!comment_scoped().strip(input).changed());
    }

    #[test]
    fn test_single_star_comment_is_not_an_opener() {
        let input = "/* GIẢI THÍCH CHO THỰC TẬP SINH */";
        assert!(!remover().strip(input).changed());
    }

    #[test]
    fn test_sentinel_requires_word_boundary() {
        let input = "/** XGIẢI THÍCH CHO THỰC TẬP SINHY */";
        assert!(!remover().strip(input).changed());

        let input = "/** (GIẢI THÍCH CHO THỰC TẬP SINH): */";
        assert!(remover().strip(input).changed());
    }

    #[test]
    fn test_sentinel_is_case_sensitive() {
        let input = "/** giải thích cho thực tập sinh */";
        assert!(!remover().strip(input).changed());
    }

    #[test]
    fn test_strip_is_idempotent() {
        let input = format!("'use client';\n\n{HEADER}export const A = 1;\n/** doc */\nexport const B = 2;\n");
        let r = remover();
        let once = r.strip(&input).text.into_owned();
        let twice = r.strip(&once);
        assert!(!twice.changed());
        assert_eq!(twice.text, once);
        assert!(!r.has_marker(&once));
    }

    #[test]
    fn test_custom_sentinel() {
        let r = MarkerRemover::new("@internal-note").unwrap();
        let out = r.strip("/** @internal-note: drop me */x");
        assert_eq!(out.text, "x");
    }

    #[test]
    fn test_has_marker() {
        let r = remover();
        assert!(r.has_marker(HEADER));
        assert!(!r.has_marker("/** nothing here */"));
    }
}
