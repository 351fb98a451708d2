//! `{@video type url alt}` tags
//!
//! Supported types: `html5` (a `<video>` element pointing at the URL),
//! `vimeo` and `youtube` (embedded players; the URL part is the video id).
//! Unknown types are declined so the tag text stays in the output.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::{DocContext, InlineMatcher, cached_regex, fill_template};
use crate::cursor::ScanCursor;
use crate::html::{escape_attr, escape_text};
use crate::scanner::ScanState;
use crate::security::UrlValidator;

const HTML5_TEMPLATE: &str = "<video src=\"%u\">%a</video>";
const VIMEO_TEMPLATE: &str = "<p><iframe src=\"https://player.vimeo.com/video/%u\" width=\"640\" height=\"360\" frameborder=\"0\" allowfullscreen></iframe></p>";
const YOUTUBE_TEMPLATE: &str = "<p><iframe src=\"https://www.youtube.com/embed/%u\" width=\"640\" height=\"360\" frameborder=\"0\" allowfullscreen></iframe></p>";

fn video_pattern() -> Option<&'static Regex> {
    static VIDEO_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&VIDEO_REGEX, r"(?s)\A\{@video\s+(\w+)\s+(\S+?)(?:\s+(.+?))?\}")
}

fn template_for(video_type: &str) -> Option<&'static str> {
    match video_type {
        "html5" => Some(HTML5_TEMPLATE),
        "vimeo" => Some(VIMEO_TEMPLATE),
        "youtube" => Some(YOUTUBE_TEMPLATE),
        _ => None,
    }
}

/// Matcher for `{@video type url alt}`
pub struct InlineVideo<'a> {
    doc_context: &'a DocContext,
    validator: UrlValidator,
}

impl<'a> InlineVideo<'a> {
    /// Create a matcher reporting problems at `doc_context`
    pub fn new(doc_context: &'a DocContext) -> Self {
        Self {
            doc_context,
            validator: UrlValidator::new(),
        }
    }
}

impl InlineMatcher for InlineVideo<'_> {
    fn try_consume(&self, cursor: &mut ScanCursor<'_>, _state: &mut ScanState) -> Option<String> {
        let caps = cursor.peek(video_pattern()?)?;
        let video_type = caps.get(1).map_or("", |m| m.as_str());
        let url = caps.get(2).map_or("", |m| m.as_str());
        let alt = caps.get(3).map_or("", |m| m.as_str());

        let Some(template) = template_for(video_type) else {
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "Unknown video type {}",
                video_type
            );
            return None;
        };
        cursor.accept(&caps);

        if self.validator.sanitize_url(url).is_none() {
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "{{@video}} refers to unsafe URL {}",
                url
            );
            return Some(escape_text(alt));
        }

        let html = fill_template(template, |placeholder| match placeholder {
            "%u" => Some(escape_attr(url)),
            "%a" => Some(escape_text(alt)),
            _ => None,
        });
        Some(html.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume(input: &str) -> (Option<String>, String) {
        let doc_context = DocContext::default();
        let matcher = InlineVideo::new(&doc_context);
        let mut cursor = ScanCursor::new(input);
        let mut state = ScanState::default();
        let out = matcher.try_consume(&mut cursor, &mut state);
        (out, cursor.rest().to_string())
    }

    #[test]
    fn test_html5_video() {
        let (out, rest) = consume("{@video html5 movies/intro.mp4 Intro movie}.");
        assert_eq!(
            out.as_deref(),
            Some("<video src=\"movies/intro.mp4\">Intro movie</video>")
        );
        assert_eq!(rest, ".");
    }

    #[test]
    fn test_vimeo_video() {
        let (out, _) = consume("{@video vimeo 17666102}");
        assert_eq!(
            out.as_deref(),
            Some(
                "<p><iframe src=\"https://player.vimeo.com/video/17666102\" width=\"640\" height=\"360\" frameborder=\"0\" allowfullscreen></iframe></p>"
            )
        );
    }

    #[test]
    fn test_youtube_video() {
        let (out, _) = consume("{@video youtube dQw4w9WgXcQ}");
        assert!(out.unwrap().contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_unknown_type_declines() {
        let (out, rest) = consume("{@video flash movie.swf}");
        assert_eq!(out, None);
        assert_eq!(rest, "{@video flash movie.swf}");
    }

    #[test]
    fn test_unsafe_url_is_refused() {
        let (out, rest) = consume("{@video html5 javascript:alert(1) <b>x</b>}");
        assert_eq!(out.as_deref(), Some("&lt;b&gt;x&lt;/b&gt;"));
        assert_eq!(rest, "");
    }
}
