//! `@example` code blocks
//!
//! A code block whose first line is `@example` (optionally followed by CSS
//! class names) is marked up as an inline example:
//!
//! ```text
//! <pre><code>@example preview    =>    <pre class='inline-example preview'><code>
//! ```
//!
//! The marker line holds only class names. A marker line followed by
//! anything else (such as the closing `</code></pre>`) is left untouched.

use std::sync::OnceLock;

use regex::Regex;

use super::{InlineMatcher, cached_regex};
use crate::cursor::ScanCursor;
use crate::scanner::ScanState;

fn example_pattern() -> Option<&'static Regex> {
    static EXAMPLE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(
        &EXAMPLE_REGEX,
        r"\A<pre><code>\s*@example((?:[ \t]+[\w-]+)*)[ \t]*\r?\n\s*",
    )
}

/// Matcher for the `@example` marker directly after `<pre><code>`
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExample;

impl InlineExample {
    /// Create the matcher
    pub fn new() -> Self {
        Self
    }
}

impl InlineMatcher for InlineExample {
    fn try_consume(&self, cursor: &mut ScanCursor<'_>, _state: &mut ScanState) -> Option<String> {
        let caps = cursor.scan(example_pattern()?)?;
        let classes: Vec<&str> = caps
            .get(1)
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();
        Some(format!(
            "<pre class='inline-example {}'><code>",
            classes.join(" ")
        ))
    }
}
