//! Inline tag matchers
//!
//! Each matcher looks at the scanner's current position and either consumes
//! a tag-shaped piece of input, returning the markup that replaces it, or
//! declines without moving the cursor.
//!
//! - `link`: `{@link Class#member text}` and link construction
//! - `auto_link`: bare `Class#member`, `#member` and `Namespace.Class` in text
//! - `image`: `{@img path alt}`
//! - `video`: `{@video type url alt}`
//! - `example`: `@example` marker at the start of a code block

pub mod auto_link;
pub mod example;
pub mod image;
pub mod link;
pub mod video;

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::cursor::ScanCursor;
use crate::scanner::ScanState;

pub use auto_link::AutoLink;
pub use example::InlineExample;
pub use image::{ImageRef, InlineImage};
pub use link::{InlineLink, LinkRenderer};
pub use video::InlineVideo;

/// A rule that may replace the text at the cursor
pub trait InlineMatcher {
    /// Consume a tag at the cursor and return its replacement, or return
    /// `None` and leave the cursor where it was
    fn try_consume(&self, cursor: &mut ScanCursor<'_>, state: &mut ScanState) -> Option<String>;
}

/// Where the comment being formatted came from, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct DocContext {
    pub filename: String,
    pub line: usize,
}

impl DocContext {
    /// Location of a comment in its source file
    pub fn new(filename: impl Into<String>, line: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

/// Replace `%x` placeholders in `template`
///
/// Placeholders `resolve` does not know are kept as written.
pub(crate) fn fill_template<'t>(
    template: &'t str,
    resolve: impl Fn(&str) -> Option<String>,
) -> Cow<'t, str> {
    static PLACEHOLDER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(regex) = PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"%[\w#-]").ok())
        .as_ref()
    else {
        return Cow::Borrowed(template);
    };

    regex.replace_all(template, |caps: &Captures| {
        let placeholder = &caps[0];
        resolve(placeholder).unwrap_or_else(|| placeholder.to_string())
    })
}

/// Compile a pattern once and keep it for the life of the process
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}
