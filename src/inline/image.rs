//! `{@img path alt}` tags

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::{DocContext, InlineMatcher, cached_regex, fill_template};
use crate::cursor::ScanCursor;
use crate::error::FormatError;
use crate::html::escape_attr;
use crate::scanner::ScanState;
use crate::security::UrlValidator;

/// Default image markup
pub const DEFAULT_IMAGE_TEMPLATE: &str = "<p><img src=\"%u\" alt=\"%a\"></p>";

fn image_pattern() -> Option<&'static Regex> {
    static IMAGE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&IMAGE_REGEX, r"(?s)\A\{@img\s+(\S+?)(?:\s+(.+?))?\}")
}

/// Check that an image template references the image URL
pub fn validate_image_template(template: &str) -> Result<(), FormatError> {
    if template.contains("%u") {
        Ok(())
    } else {
        Err(FormatError::InvalidTemplate(format!(
            "image template must contain %u: {template}"
        )))
    }
}

/// An image referenced from a comment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Path as written in the tag, relative to the image base path
    pub filename: String,
    /// Alternative text, empty when none was given
    pub alt: String,
}

/// Matcher for `{@img path alt}`
pub struct InlineImage<'a> {
    base_path: Option<&'a str>,
    template: &'a str,
    doc_context: &'a DocContext,
    validator: UrlValidator,
}

impl<'a> InlineImage<'a> {
    /// Create a matcher; `base_path` is prepended to every image path
    pub fn new(base_path: Option<&'a str>, template: &'a str, doc_context: &'a DocContext) -> Self {
        Self {
            base_path,
            template,
            doc_context,
            validator: UrlValidator::new(),
        }
    }

    fn url_for(&self, filename: &str) -> String {
        match self.base_path {
            Some(base) if !base.is_empty() => {
                format!("{}/{}", base.trim_end_matches('/'), filename)
            }
            _ => filename.to_string(),
        }
    }
}

impl InlineMatcher for InlineImage<'_> {
    fn try_consume(&self, cursor: &mut ScanCursor<'_>, state: &mut ScanState) -> Option<String> {
        let caps = cursor.scan(image_pattern()?)?;
        let filename = caps.get(1).map_or("", |m| m.as_str());
        let alt = caps.get(2).map_or("", |m| m.as_str());

        if self.validator.sanitize_url(filename).is_none() {
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "{{@img}} refers to unsafe URL {}",
                filename
            );
            return Some(escape_attr(alt));
        }

        let url = self.url_for(filename);
        state.images.push(ImageRef {
            filename: filename.to_string(),
            alt: alt.to_string(),
        });

        let html = fill_template(self.template, |placeholder| match placeholder {
            "%u" => Some(escape_attr(&url)),
            "%a" => Some(escape_attr(alt)),
            _ => None,
        });
        Some(html.into_owned())
    }
}
