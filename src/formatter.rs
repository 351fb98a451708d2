//! Documentation comment formatter
//!
//! [`DocFormatter`] is the entry point of the crate. It holds the formatting
//! configuration and the class relations table, and exposes:
//!
//! - [`DocFormatter::replace`]: inline tag scanning of text that is already HTML
//! - [`DocFormatter::format`]: Markdown rendering followed by tag scanning
//! - [`DocFormatter::shorten`] / [`DocFormatter::too_long`]: listing summaries
//! - [`DocFormatter::link`]: link markup for a class or member
//!
//! # Pipeline
//!
//! ```text
//! comment ──preprocess──► markdown ──render──► html ──scan──► html + images
//! ```
//!
//! # Per-call state
//!
//! Everything that changes during a scan (open anchor count, referenced
//! images) lives in the scan itself and is handed back in a [`Rendered`]
//! value. A formatter can therefore be shared between threads once it has
//! been configured; [`ImageCollector`] gathers images across calls for
//! callers that need the full set.
//!
//! # Examples
//!
//! ```rust
//! use doc_comment_formatter::formatter::DocFormatter;
//! use doc_comment_formatter::relations::{ClassInfo, Member, Relations};
//!
//! let mut formatter = DocFormatter::new();
//! formatter.set_relations(Relations::new([
//!     ClassInfo::new("Ext.Panel").member(Member::method("show")),
//! ]));
//! formatter.set_class_context("Ext.Panel");
//!
//! let html = formatter.format("Call {@link #show} to display it.");
//! assert_eq!(
//!     html,
//!     "<p>Call <a href=\"#!/api/Ext.Panel-method-show\" rel=\"Ext.Panel-method-show\" class=\"docClass\">show</a> to display it.</p>\n"
//! );
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::cache::{RenderCache, content_digest};
use crate::charset::decode_source;
use crate::error::FormatError;
use crate::inline::image::{DEFAULT_IMAGE_TEMPLATE, validate_image_template};
use crate::inline::link::{DEFAULT_LINK_TEMPLATE, validate_link_template};
use crate::inline::{
    AutoLink, DocContext, ImageRef, InlineImage, InlineLink, InlineVideo, LinkRenderer,
};
use crate::markdown::{CommonMarkRenderer, MarkdownRenderer, preprocess};
use crate::relations::{MemberKind, Relations};
use crate::scanner::{Rendered, TagScanner};
use crate::shorten::{DEFAULT_MAX_LENGTH, Shortener};

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Maximum summary length in characters
    pub max_length: usize,
    /// Directory prepended to `{@img}` paths
    pub image_base_path: Option<String>,
    /// Class that bare `#member` references resolve against
    pub class_context: String,
    /// Source location reported in diagnostics
    pub doc_context: DocContext,
    /// Link markup template
    pub link_template: String,
    /// Image markup template
    pub image_template: String,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            image_base_path: None,
            class_context: String::new(),
            doc_context: DocContext::default(),
            link_template: DEFAULT_LINK_TEMPLATE.to_string(),
            image_template: DEFAULT_IMAGE_TEMPLATE.to_string(),
        }
    }
}

/// Formats documentation comments to HTML
pub struct DocFormatter<R: MarkdownRenderer = CommonMarkRenderer> {
    options: FormatterOptions,
    relations: Arc<Relations>,
    relations_fingerprint: String,
    renderer: R,
}

impl DocFormatter<CommonMarkRenderer> {
    /// Create a formatter with default options and an empty relations table
    pub fn new() -> Self {
        Self::with_renderer(CommonMarkRenderer::new())
    }

    /// Create a formatter with custom options
    ///
    /// # Errors
    ///
    /// - `FormatError::InvalidTemplate` when a template lacks its mandatory
    ///   placeholder
    pub fn with_options(options: FormatterOptions) -> Result<Self, FormatError> {
        validate_link_template(&options.link_template)?;
        validate_image_template(&options.image_template)?;
        let mut formatter = Self::new();
        formatter.options = options;
        Ok(formatter)
    }
}

impl Default for DocFormatter<CommonMarkRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MarkdownRenderer> DocFormatter<R> {
    /// Create a formatter that renders Markdown with `renderer`
    pub fn with_renderer(renderer: R) -> Self {
        let relations = Arc::new(Relations::default());
        Self {
            options: FormatterOptions::default(),
            relations_fingerprint: relations.fingerprint(),
            relations,
            renderer,
        }
    }

    /// Current options
    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// Maximum summary length in characters
    pub fn max_length(&self) -> usize {
        self.options.max_length
    }

    /// Set the maximum summary length used by `shorten` and `too_long`
    pub fn set_max_length(&mut self, max_length: usize) {
        self.options.max_length = max_length;
    }

    /// Set the directory prepended to `{@img}` paths
    ///
    /// A trailing `/` is optional.
    pub fn set_image_base_path(&mut self, path: impl Into<String>) {
        self.options.image_base_path = Some(path.into());
    }

    /// Set the class that `#member` references resolve against
    pub fn set_class_context(&mut self, class_name: impl Into<String>) {
        self.options.class_context = class_name.into();
    }

    /// Source location reported in diagnostics
    pub fn doc_context(&self) -> &DocContext {
        &self.options.doc_context
    }

    /// Set the source location reported in diagnostics
    pub fn set_doc_context(&mut self, context: DocContext) {
        self.options.doc_context = context;
    }

    /// Replace the relations table used for link resolution
    pub fn set_relations(&mut self, relations: impl Into<Arc<Relations>>) {
        let relations = relations.into();
        self.relations_fingerprint = relations.fingerprint();
        self.relations = relations;
    }

    /// Set the link markup template
    ///
    /// # Arguments
    ///
    /// * `template` - Markup with `%c`, `%m`, `%#`, `%-` and `%a` placeholders
    ///
    /// # Errors
    ///
    /// - `FormatError::InvalidTemplate` when `%a` is missing; the previous
    ///   template stays in effect
    pub fn set_link_template(&mut self, template: impl Into<String>) -> Result<(), FormatError> {
        let template = template.into();
        validate_link_template(&template)?;
        self.options.link_template = template;
        Ok(())
    }

    /// Set the image markup template
    ///
    /// # Arguments
    ///
    /// * `template` - Markup with `%u` (URL) and `%a` (alt text) placeholders
    ///
    /// # Errors
    ///
    /// - `FormatError::InvalidTemplate` when `%u` is missing; the previous
    ///   template stays in effect
    pub fn set_image_template(&mut self, template: impl Into<String>) -> Result<(), FormatError> {
        let template = template.into();
        validate_image_template(&template)?;
        self.options.image_template = template;
        Ok(())
    }

    fn link_renderer(&self) -> LinkRenderer<'_> {
        LinkRenderer::new(&self.relations, &self.options.link_template)
    }

    fn scanner(&self) -> TagScanner<'_> {
        let renderer = self.link_renderer();
        let class_context = self.options.class_context.as_str();
        let doc_context = &self.options.doc_context;
        TagScanner::new(
            InlineLink::new(renderer, class_context, doc_context),
            InlineImage::new(
                self.options.image_base_path.as_deref(),
                &self.options.image_template,
                doc_context,
            ),
            InlineVideo::new(doc_context),
            AutoLink::new(renderer, class_context, doc_context),
        )
    }

    /// Scan HTML for inline tags, returning the markup and referenced images
    pub fn render(&self, input: &str) -> Rendered {
        self.scanner().replace(input)
    }

    /// Scan HTML for inline tags
    ///
    /// # Examples
    ///
    /// ```rust
    /// use doc_comment_formatter::formatter::DocFormatter;
    ///
    /// let formatter = DocFormatter::new();
    /// assert_eq!(formatter.replace("<div"), "<div");
    /// assert_eq!(
    ///     formatter.replace("<pre><code>\n@example preview\nfoo</code></pre>"),
    ///     "<pre class='inline-example preview'><code>foo</code></pre>"
    /// );
    /// ```
    pub fn replace(&self, input: &str) -> String {
        self.render(input).html
    }

    /// Render Markdown and scan the result, returning markup and images
    pub fn format_rendered(&self, input: &str) -> Rendered {
        let html = self.renderer.render(&preprocess(input));
        let rendered = self.render(&html);
        trace!(
            input_len = input.len(),
            output_len = rendered.html.len(),
            images = rendered.images.len(),
            "formatted comment"
        );
        rendered
    }

    /// Render Markdown and scan the result for inline tags
    pub fn format(&self, input: &str) -> String {
        self.format_rendered(input).html
    }

    /// Decode source bytes and format them
    ///
    /// # Errors
    ///
    /// - `FormatError::Encoding` when the bytes cannot be decoded
    pub fn format_bytes(&self, bytes: &[u8], encoding: Option<&str>) -> Result<Rendered, FormatError> {
        let text = decode_source(bytes, encoding)?;
        Ok(self.format_rendered(&text))
    }

    /// Format through a cache shared across calls
    ///
    /// The cache key covers the input, the class context, the image base
    /// path, both templates and the relations table.
    pub fn format_cached<'c>(&self, cache: &'c mut RenderCache, input: &str) -> &'c Rendered {
        let key = content_digest(&[
            &self.options.class_context,
            self.options.image_base_path.as_deref().unwrap_or(""),
            &self.options.link_template,
            &self.options.image_template,
            &self.relations_fingerprint,
            input,
        ]);
        cache.get_or_insert_with(key, || self.format_rendered(input))
    }

    fn shortener(&self) -> Shortener {
        Shortener::with_max_length(self.options.max_length)
    }

    /// Summary of a comment for listing views
    pub fn shorten(&self, input: &str) -> String {
        self.shortener().shorten(input)
    }

    /// True when the comment should be shown shortened
    pub fn too_long(&self, input: &str) -> bool {
        self.shortener().too_long(input)
    }

    /// Link markup for a class or one of its members
    pub fn link(
        &self,
        class_name: &str,
        member: Option<&str>,
        anchor_text: &str,
        kind: Option<MemberKind>,
        is_static: Option<bool>,
    ) -> String {
        self.link_renderer()
            .link(class_name, member, anchor_text, kind, is_static)
    }
}

/// Images gathered over several formatting calls
///
/// Each file name is kept once, with the alt text of its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ImageCollector {
    images: Vec<ImageRef>,
}

impl ImageCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the images referenced by one formatting call
    pub fn absorb(&mut self, rendered: &Rendered) {
        for image in &rendered.images {
            if !self.images.iter().any(|known| known.filename == image.filename) {
                self.images.push(image.clone());
            }
        }
    }

    /// Images collected so far, in first-seen order
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::{ClassInfo, Member};

    fn formatter() -> DocFormatter {
        let mut formatter = DocFormatter::new();
        formatter.set_relations(Relations::new([
            ClassInfo::new("Ext.Panel")
                .member(Member::method("show"))
                .member(Member::cfg("title")),
            ClassInfo::new("Ext.Button"),
        ]));
        formatter.set_class_context("Ext.Panel");
        formatter.set_link_template("<a href=\"%c%#%m\">%a</a>").unwrap();
        formatter
    }

    #[test]
    fn test_defaults() {
        let formatter = DocFormatter::new();
        assert_eq!(formatter.max_length(), 120);
        assert_eq!(formatter.doc_context(), &DocContext::default());
        assert_eq!(formatter.options().link_template, DEFAULT_LINK_TEMPLATE);
    }

    #[test]
    fn test_with_options_validates_templates() {
        let options = FormatterOptions {
            image_template: "<img>".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            DocFormatter::with_options(options),
            Err(FormatError::InvalidTemplate(_))
        ));
        let options = FormatterOptions {
            max_length: 40,
            ..Default::default()
        };
        assert_eq!(DocFormatter::with_options(options).unwrap().max_length(), 40);
    }

    #[test]
    fn test_invalid_link_template_keeps_previous() {
        let mut formatter = formatter();
        assert!(formatter.set_link_template("<a>").is_err());
        assert_eq!(formatter.options().link_template, "<a href=\"%c%#%m\">%a</a>");
    }

    #[test]
    fn test_format_renders_markdown_and_tags() {
        let formatter = formatter();
        assert_eq!(
            formatter.format("Sets the **title**, see {@link Ext.Button}."),
            "<p>Sets the <strong>title</strong>, see <a href=\"Ext.Button\">Ext.Button</a>.</p>\n"
        );
    }

    #[test]
    fn test_format_example_code_block() {
        let formatter = formatter();
        assert_eq!(
            formatter.format("Example:<pre><code>\n@example preview\nvar p;\n</code></pre>\n"),
            "<p>Example:</p>\n<pre class='inline-example preview'><code>var p;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_format_indented_example() {
        let formatter = formatter();
        assert_eq!(
            formatter.format("    @example\n    show();\n"),
            "<pre class='inline-example '><code>show();\n</code></pre>\n"
        );
    }

    #[test]
    fn test_example_marker_ending_code_block_keeps_markup() {
        let formatter = DocFormatter::new();
        let input = "<pre><code>@example foo</code></pre>\n<p>x</p>";
        assert_eq!(formatter.replace(input), input);
    }

    #[test]
    fn test_link_passthrough() {
        let formatter = formatter();
        assert_eq!(
            formatter.link("Ext.Panel", Some("title"), "title", Some(MemberKind::Cfg), None),
            "<a href=\"Ext.Panel#cfg-title\">title</a>"
        );
        assert_eq!(
            formatter.link("Ext.Button", None, "button", None, None),
            "<a href=\"Ext.Button\">button</a>"
        );
    }

    #[test]
    fn test_render_returns_images() {
        let mut formatter = formatter();
        formatter.set_image_base_path("images");
        let rendered = formatter.render("{@img a.png Alpha}");
        assert_eq!(rendered.images.len(), 1);
        assert!(rendered.html.contains("src=\"images/a.png\""));
    }

    #[test]
    fn test_image_collector_deduplicates() {
        let formatter = formatter();
        let mut collector = ImageCollector::new();
        collector.absorb(&formatter.render("{@img a.png First} {@img b.png}"));
        collector.absorb(&formatter.render("{@img a.png Second}"));

        let images = collector.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].alt, "First");
        assert_eq!(images[1].filename, "b.png");
    }

    #[test]
    fn test_format_bytes() {
        let formatter = formatter();
        let rendered = formatter.format_bytes(b"Caf\xE9 #show", Some("ISO-8859-1")).unwrap();
        assert_eq!(
            rendered.html,
            "<p>Café <a href=\"Ext.Panel#method-show\">show</a></p>\n"
        );
        assert!(formatter.format_bytes(b"\xFF", None).is_err());
    }

    #[test]
    fn test_format_cached_key_includes_class_context() {
        let mut formatter = formatter();
        let mut cache = RenderCache::new();

        let first = formatter.format_cached(&mut cache, "#show").clone();
        let again = formatter.format_cached(&mut cache, "#show").clone();
        assert_eq!(first, again);
        assert_eq!(cache.hits(), 1);

        formatter.set_class_context("Ext.Button");
        let other = formatter.format_cached(&mut cache, "#show").clone();
        assert_eq!(other.html, "<p>#show</p>\n");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_shorten_uses_max_length() {
        let mut formatter = formatter();
        formatter.set_max_length(10);
        assert!(formatter.too_long("<p>0123456789a</p>"));
        assert_eq!(formatter.shorten("<p>0123456789abc</p>"), "0123456...");
    }

    #[test]
    fn test_formatter_is_shareable_across_threads() {
        let formatter = Arc::new(formatter());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let formatter = Arc::clone(&formatter);
                std::thread::spawn(move || formatter.render(&format!("{{@img {i}.png}} #show")))
            })
            .collect();
        for handle in handles {
            let rendered = handle.join().unwrap();
            assert_eq!(rendered.images.len(), 1);
            assert!(rendered.html.contains("method-show"));
        }
    }
}
