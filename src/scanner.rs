//! Single-pass inline tag scanner
//!
//! The scanner walks its input once. At every position it tries a fixed list
//! of rules and applies the first that matches:
//!
//! 1. `{@link}`, `{@img}` and `{@video}` matchers
//! 2. a lone `{` that starts no tag, copied as-is
//! 3. the `@example` marker right after `<pre><code>`
//! 4. an opening `<a ...>` tag, copied, anchor depth goes up
//! 5. a closing `</a>` tag, copied, anchor depth goes down
//! 6. any other tag, copied through the next `>` (or to the end of input)
//! 7. a run of text up to the next `{` or `<`, auto-linked when no anchor
//!    is open
//!
//! Every input character ends up in the output exactly once, either
//! verbatim or as part of a replaced tag. Anchor depth never goes below
//! zero: a stray `</a>` does not stop a later `<a>` from suppressing
//! auto-links.

use std::sync::OnceLock;

use regex::Regex;

use crate::cursor::ScanCursor;
use crate::inline::{
    AutoLink, ImageRef, InlineExample, InlineImage, InlineLink, InlineMatcher, InlineVideo,
    cached_regex,
};

/// Per-scan mutable state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Number of `<a>` elements currently open
    pub anchor_depth: usize,
    /// Images referenced so far, in scan order
    pub images: Vec<ImageRef>,
}

/// Result of scanning one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Output markup with inline tags replaced
    pub html: String,
    /// Images referenced by `{@img}` tags, in scan order
    pub images: Vec<ImageRef>,
}

/// Scanner rules, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Link,
    Image,
    Video,
    LiteralBrace,
    Example,
    OpenAnchor,
    CloseAnchor,
    Tag,
    Text,
}

impl Rule {
    const ORDER: [Rule; 9] = [
        Rule::Link,
        Rule::Image,
        Rule::Video,
        Rule::LiteralBrace,
        Rule::Example,
        Rule::OpenAnchor,
        Rule::CloseAnchor,
        Rule::Tag,
        Rule::Text,
    ];
}

fn open_anchor_pattern() -> Option<&'static Regex> {
    static OPEN_ANCHOR_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&OPEN_ANCHOR_REGEX, r"\A<a\b")
}

/// The inline tag scanner
pub struct TagScanner<'a> {
    link: InlineLink<'a>,
    image: InlineImage<'a>,
    video: InlineVideo<'a>,
    example: InlineExample,
    auto_link: AutoLink<'a>,
}

impl<'a> TagScanner<'a> {
    /// Create a scanner from its tag matchers
    ///
    /// # Arguments
    ///
    /// * `link` - Matcher for `{@link}` tags
    /// * `image` - Matcher for `{@img}` tags
    /// * `video` - Matcher for `{@video}` tags
    /// * `auto_link` - Linker applied to text outside anchors
    ///
    /// The `@example` rewrite needs no configuration and is always enabled.
    pub fn new(
        link: InlineLink<'a>,
        image: InlineImage<'a>,
        video: InlineVideo<'a>,
        auto_link: AutoLink<'a>,
    ) -> Self {
        Self {
            link,
            image,
            video,
            example: InlineExample::new(),
            auto_link,
        }
    }

    /// Scan `input`, replacing inline tags and auto-linking plain text
    pub fn replace(&self, input: &str) -> Rendered {
        let mut cursor = ScanCursor::new(input);
        let mut state = ScanState::default();
        let mut output = String::with_capacity(input.len() + input.len() / 4);

        while !cursor.is_eof() {
            let before = cursor.position();
            let piece = Rule::ORDER
                .iter()
                .find_map(|&rule| self.apply(rule, &mut cursor, &mut state));

            match piece {
                Some(piece) => output.push_str(&piece),
                // Unreachable while Rule::Text accepts every non-tag character
                None => output.push_str(cursor.scan_char().unwrap_or("")),
            }
            debug_assert!(cursor.position() > before, "scanner made no progress");
        }

        Rendered {
            html: output,
            images: state.images,
        }
    }

    fn apply(
        &self,
        rule: Rule,
        cursor: &mut ScanCursor<'_>,
        state: &mut ScanState,
    ) -> Option<String> {
        match rule {
            Rule::Link => self.link.try_consume(cursor, state),
            Rule::Image => self.image.try_consume(cursor, state),
            Rule::Video => self.video.try_consume(cursor, state),
            Rule::LiteralBrace => cursor.scan_str("{").map(str::to_string),
            Rule::Example => self.example.try_consume(cursor, state),
            Rule::OpenAnchor => {
                if !cursor.check(open_anchor_pattern()?) {
                    return None;
                }
                state.anchor_depth += 1;
                Some(cursor.scan_through('>').to_string())
            }
            Rule::CloseAnchor => {
                let tag = cursor.scan_str("</a>")?;
                state.anchor_depth = state.anchor_depth.saturating_sub(1);
                Some(tag.to_string())
            }
            Rule::Tag => {
                if !cursor.check_str("<") {
                    return None;
                }
                Some(cursor.scan_through('>').to_string())
            }
            Rule::Text => {
                let text = cursor.scan_while(|ch| ch != '{' && ch != '<');
                if text.is_empty() {
                    None
                } else if state.anchor_depth > 0 {
                    Some(text.to_string())
                } else {
                    Some(self.auto_link.replace(text))
                }
            }
        }
    }
}
