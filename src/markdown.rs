//! Markdown rendering of comment text
//!
//! Comments are written in Markdown that may embed raw `<pre>` blocks.
//! Before rendering, [`preprocess`] makes sure every `<pre>` starts its own
//! line (otherwise the renderer does not see it as a block and may wrap it
//! in a second code block) and drops the newline directly after `<pre>` or
//! `<pre><code>` so code never starts with a blank line.
//!
//! # Examples
//!
//! ```rust
//! use doc_comment_formatter::markdown::{preprocess, CommonMarkRenderer, MarkdownRenderer};
//!
//! assert_eq!(preprocess("Text<pre>\ncode</pre>"), "Text\n<pre>code</pre>");
//!
//! let html = CommonMarkRenderer::new().render("Some *emphasis*.");
//! assert_eq!(html, "<p>Some <em>emphasis</em>.</p>\n");
//! ```

use std::sync::OnceLock;

use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

use crate::inline::cached_regex;

/// Converts Markdown to HTML
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with table and strikethrough extensions
///
/// Raw HTML in the input is passed through to the output.
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl CommonMarkRenderer {
    /// Renderer with tables and strikethrough enabled
    pub fn new() -> Self {
        Self::with_options(Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
    }

    /// Renderer with custom pulldown-cmark options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Normalize `<pre>` placement before Markdown rendering
pub fn preprocess(input: &str) -> String {
    static PRE_INLINE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static PRE_NEWLINE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    let Some(pre_inline) = cached_regex(&PRE_INLINE_REGEX, r"([^\n])<pre>") else {
        return input.to_string();
    };
    let Some(pre_newline) = cached_regex(&PRE_NEWLINE_REGEX, r"<pre>(<code>)?\n?") else {
        return input.to_string();
    };

    let separated = pre_inline.replace_all(input, "${1}\n<pre>");
    pre_newline
        .replace_all(&separated, "<pre>${1}")
        .into_owned()
}
