//! Length-bounded summaries of comments
//!
//! Listing views show the first sentence of a comment, cut to a maximum
//! number of characters. All lengths are counted in characters of the
//! tag-stripped text, never in bytes.

use std::sync::OnceLock;

use regex::Regex;

use crate::char_count::{char_count, take_chars};
use crate::html::{escape_text, strip_tags};
use crate::inline::cached_regex;

/// Default summary length in characters
pub const DEFAULT_MAX_LENGTH: usize = 120;

const ELLIPSIS: &str = "...";

fn sentence_pattern() -> Option<&'static Regex> {
    static SENTENCE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&SENTENCE_REGEX, r"(?s)\A(.+?[.。])\s")
}

/// Prefix of `text` through its first `.` or `。` that is followed by
/// whitespace, or all of `text` when there is no such terminator
///
/// # Examples
///
/// ```rust
/// use doc_comment_formatter::shorten::first_sentence;
///
/// assert_eq!(first_sentence("Creates a panel. Then shows it."), "Creates a panel.");
/// assert_eq!(first_sentence("パネル。表示する。"), "パネル。表示する。");
/// assert_eq!(first_sentence("パネル。 表示する。"), "パネル。");
/// assert_eq!(first_sentence("no terminator here"), "no terminator here");
/// ```
pub fn first_sentence(text: &str) -> &str {
    sentence_pattern()
        .and_then(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map_or(text, |sentence| sentence.as_str())
}

/// Produces summaries bounded by a maximum character count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortener {
    max_length: usize,
}

impl Shortener {
    /// Shortener with the default maximum length
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LENGTH)
    }

    /// Shortener with a custom maximum length in characters
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Maximum summary length in characters
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// True when the comment needs a summary: either its text has more
    /// than one sentence or it is longer than the maximum length
    pub fn too_long(&self, input: &str) -> bool {
        let stripped = strip_tags(input);
        let stripped = stripped.trim();
        let sentence = first_sentence(stripped);
        sentence.len() < stripped.len() || char_count(stripped) > self.max_length
    }

    /// Summary of the comment: its first sentence followed by an ellipsis,
    /// cut to the maximum length when the sentence itself is too long
    ///
    /// The result is HTML-escaped text.
    pub fn shorten(&self, input: &str) -> String {
        let stripped = strip_tags(input);
        let sentence = first_sentence(stripped.trim());

        let summary = if char_count(sentence) > self.max_length {
            let keep = self.max_length.saturating_sub(ELLIPSIS.len());
            format!("{}{}", take_chars(sentence, keep), ELLIPSIS)
        } else {
            format!("{sentence} {ELLIPSIS}")
        };
        escape_text(&summary)
    }
}

impl Default for Shortener {
    fn default() -> Self {
        Self::new()
    }
}
