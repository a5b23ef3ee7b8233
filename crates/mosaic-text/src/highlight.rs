//! Stateless, per-line syntax classification.
//!
//! A `HighlightRule` describes one language: its file extensions, a
//! keyword table indexed by identifier byte length (mirroring the
//! original's `keywords[MaxKeywordSize]`), comment delimiters, and which
//! literal classes it colors at all. Classification never looks past the
//! line it is given — no multi-line comment/string state is carried
//! between lines, matching the distilled design's stateless renderer.

use crate::color::ColorType;

/// Upper bound on a classified identifier's length before it is assumed to
/// never match a keyword table entry.
pub const MAX_KEYWORD_SIZE: usize = 32;

/// A single language's highlighting rule set.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    /// Keyword lists indexed by identifier length; `keywords[n]` holds every
    /// keyword exactly `n` bytes long, or is empty if none exist.
    pub keywords: [&'static [&'static str]; MAX_KEYWORD_SIZE],
    pub single_line_comment_start: &'static str,
    pub multiline_comment_start: &'static str,
    pub multiline_comment_end: &'static str,
    pub comments: bool,
    pub multiline_comments: bool,
    pub strings: bool,
    pub chars: bool,
    pub numbers: bool,
}

impl HighlightRule {
    pub fn matches_extension(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| path.ends_with(ext))
    }
}

const EMPTY: &[&str] = &[];

const C_KEYWORDS_2: &[&str] = &["if"];
const C_KEYWORDS_3: &[&str] = &["int", "for"];
const C_KEYWORDS_4: &[&str] = &["case", "else", "true", "char", "void", "bool"];
const C_KEYWORDS_5: &[&str] = &["float", "break", "false", "while"];
const C_KEYWORDS_6: &[&str] = &["static", "struct", "return", "#endif"];
const C_KEYWORDS_7: &[&str] = &["#define", "#ifndef"];
const C_KEYWORDS_8: &[&str] = &["#include"];

fn c_keyword_table() -> [&'static [&'static str]; MAX_KEYWORD_SIZE] {
    let mut table: [&'static [&'static str]; MAX_KEYWORD_SIZE] = [EMPTY; MAX_KEYWORD_SIZE];
    table[2] = C_KEYWORDS_2;
    table[3] = C_KEYWORDS_3;
    table[4] = C_KEYWORDS_4;
    table[5] = C_KEYWORDS_5;
    table[6] = C_KEYWORDS_6;
    table[7] = C_KEYWORDS_7;
    table[8] = C_KEYWORDS_8;
    table
}

/// Returns the single built-in rule set (C-like). Other languages are not
/// shipped — the engine's job is to consume whatever rule set it is given,
/// not to enumerate languages.
pub fn c_like() -> HighlightRule {
    HighlightRule {
        name: "c",
        extensions: &[".c", ".h"],
        keywords: c_keyword_table(),
        single_line_comment_start: "//",
        multiline_comment_start: "/*",
        multiline_comment_end: "*/",
        comments: true,
        multiline_comments: true,
        strings: true,
        chars: true,
        numbers: true,
    }
}

/// Returns every built-in rule set, tried in order against a file's path.
pub fn built_in_rules() -> Vec<HighlightRule> {
    vec![c_like()]
}

pub fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_number(c: u8) -> bool {
    c.is_ascii_digit()
}

pub fn is_identifier_literal(c: u8) -> bool {
    is_letter(c) || is_number(c) || c == b'_'
}

/// Classifies a single line's bytes into one `ColorType` per byte.
///
/// No rule set means everything is classified as the plain foreground
/// color. This never reads state from adjacent lines.
pub fn classify_line(data: &[u8], rule: Option<&HighlightRule>) -> Vec<ColorType> {
    let mut colors = vec![ColorType::EditorForeground; data.len()];
    let Some(rule) = rule else {
        return colors;
    };

    let size = data.len();
    let single = rule.single_line_comment_start.as_bytes();
    let mut i = 0usize;

    while i < size {
        while i < size && data[i] == b' ' {
            colors[i] = ColorType::EditorForeground;
            i += 1;
        }
        if i >= size {
            break;
        }
        let c = data[i];

        if is_number(c) {
            while i < size && is_number(data[i]) {
                colors[i] = if rule.numbers {
                    ColorType::Number
                } else {
                    ColorType::EditorForeground
                };
                i += 1;
            }
        } else if c == b'"' {
            let string_color = if rule.strings {
                ColorType::String
            } else {
                ColorType::EditorForeground
            };
            colors[i] = string_color;
            i += 1;
            while i < size && data[i] != b'"' {
                colors[i] = string_color;
                i += 1;
            }
            if i < size {
                colors[i] = string_color;
                i += 1;
            }
        } else if !single.is_empty() && data[i..].starts_with(single) {
            for color in colors.iter_mut().skip(i) {
                *color = ColorType::Comment;
            }
            break;
        } else if is_letter(c) {
            let start = i;
            while i < size && is_identifier_literal(data[i]) {
                i += 1;
            }
            let word_len = i - start;
            let mut color = ColorType::EditorForeground;
            if word_len < MAX_KEYWORD_SIZE {
                let list = rule.keywords[word_len];
                if list.iter().any(|kw| kw.as_bytes() == &data[start..i]) {
                    color = ColorType::Keyword;
                }
            }
            for c in colors.iter_mut().take(i).skip(start) {
                *c = color;
            }
        } else {
            colors[i] = ColorType::EditorForeground;
            i += 1;
        }
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_keyword() {
        let rule = c_like();
        let colors = classify_line(b"int x", Some(&rule));
        assert_eq!(colors[0], ColorType::Keyword);
        assert_eq!(colors[1], ColorType::Keyword);
        assert_eq!(colors[2], ColorType::Keyword);
        assert_eq!(colors[4], ColorType::EditorForeground);
    }

    #[test]
    fn classifies_number() {
        let rule = c_like();
        let colors = classify_line(b"42", Some(&rule));
        assert!(colors.iter().all(|c| *c == ColorType::Number));
    }

    #[test]
    fn classifies_single_line_comment_to_end() {
        let rule = c_like();
        let colors = classify_line(b"x // comment", Some(&rule));
        assert_eq!(colors[0], ColorType::EditorForeground);
        assert_eq!(colors[2], ColorType::Comment);
        assert_eq!(*colors.last().unwrap(), ColorType::Comment);
    }

    #[test]
    fn classifies_string_literal() {
        let rule = c_like();
        let colors = classify_line(b"\"hi\"", Some(&rule));
        assert!(colors.iter().all(|c| *c == ColorType::String));
    }

    #[test]
    fn no_rule_is_all_foreground() {
        let colors = classify_line(b"int x", None);
        assert!(colors.iter().all(|c| *c == ColorType::EditorForeground));
    }

    #[test]
    fn non_keyword_identifier_is_foreground() {
        let rule = c_like();
        let colors = classify_line(b"foobar", Some(&rule));
        assert!(colors.iter().all(|c| *c == ColorType::EditorForeground));
    }

    #[test]
    fn extension_matching() {
        let rule = c_like();
        assert!(rule.matches_extension("main.c"));
        assert!(!rule.matches_extension("main.rs"));
    }
}
