//! HTML helpers: tag stripping and escaping
//!
//! Tag stripping parses the fragment with html5ever and keeps only text
//! nodes, so entities come back decoded and comments disappear. Text that is
//! placed back into markup goes through [`escape_text`] or [`escape_attr`].

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Remove all markup from `html`, returning its decoded text content
///
/// A trailing `<` with no closing `>` is not a tag: it and everything after
/// it are kept as written, the same way the tag scanner copies an
/// unterminated tag through to the end of input.
///
/// # Examples
///
/// ```rust
/// use doc_comment_formatter::html::strip_tags;
///
/// assert_eq!(strip_tags("<p>Fish &amp; <b>chips</b></p>"), "Fish & chips");
/// assert_eq!(strip_tags("no markup"), "no markup");
/// assert_eq!(strip_tags("<i>Compare</i> a<b"), "Compare a<b");
/// ```
pub fn strip_tags(html: &str) -> String {
    let (markup, tail) = split_unterminated_tag(html);
    if !markup.contains(['<', '&']) {
        return html.to_string();
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(markup);
    let mut output = String::with_capacity(html.len());
    collect_text(&dom.document, &mut output);
    output.push_str(tail);
    output
}

/// Split off a final `<` that is never closed by `>`
fn split_unterminated_tag(html: &str) -> (&str, &str) {
    match html.rfind('<') {
        Some(open) if !html[open..].contains('>') => html.split_at(open),
        _ => (html, ""),
    }
}

fn collect_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        NodeData::Document | NodeData::Element { .. } => {
            for child in node.children.borrow().iter() {
                collect_text(child, output);
            }
        }
        _ => {
            // Comments, doctypes and processing instructions carry no text
        }
    }
}

/// Escape text for use between tags
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
