//! Auto-linking of class and member names in plain text
//!
//! Recognized tokens:
//!
//! - `Class#member` links to the member, shown as `Class.member`
//! - `#member` links to a member of the current class context
//! - `Namespace.Class` (or `Namespace.Class.member`) when the first segment
//!   is a namespace known to the relations table
//!
//! Anything that does not resolve is reproduced exactly as it was written.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{DocContext, LinkRenderer, cached_regex};
use crate::relations::MemberQuery;

/// File extensions that look like dotted class names but never are
const FILE_EXTENSIONS: &[&str] = &[".js", ".css", ".html", ".php"];

fn magic_link_pattern() -> Option<&'static Regex> {
    static MAGIC_LINK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(
        &MAGIC_LINK_REGEX,
        r"(?:\b([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*))?#([\w$]+)|\b([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)+)",
    )
}

fn is_hex_color(member: &str) -> bool {
    matches!(member.len(), 3 | 6) && member.chars().all(|ch| ch.is_ascii_hexdigit())
}

/// Turns recognized identifiers in a run of plain text into links
pub struct AutoLink<'a> {
    renderer: LinkRenderer<'a>,
    class_context: &'a str,
    doc_context: &'a DocContext,
}

impl<'a> AutoLink<'a> {
    /// Create a linker resolving `#member` against `class_context`
    pub fn new(
        renderer: LinkRenderer<'a>,
        class_context: &'a str,
        doc_context: &'a DocContext,
    ) -> Self {
        Self {
            renderer,
            class_context,
            doc_context,
        }
    }

    /// Replace every resolvable token in `text` with a link
    pub fn replace(&self, text: &str) -> String {
        if self.renderer.relations().is_empty() {
            return text.to_string();
        }
        let Some(pattern) = magic_link_pattern() else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| self.replace_token(caps))
            .into_owned()
    }

    fn replace_token(&self, caps: &Captures) -> String {
        let original = caps.get(0).map_or("", |m| m.as_str());
        let resolved = match caps.get(2) {
            Some(member) => {
                let class = caps.get(1).map(|m| m.as_str());
                self.resolve_member(class, member.as_str())
            }
            None => caps
                .get(3)
                .and_then(|class| self.resolve_dotted(class.as_str())),
        };
        resolved.unwrap_or_else(|| original.to_string())
    }

    fn has_member(&self, class: &str, member: &str) -> bool {
        !self
            .renderer
            .relations()
            .find_members(class, &MemberQuery::named(member))
            .is_empty()
    }

    fn resolve_member(&self, class: Option<&str>, member: &str) -> Option<String> {
        let relations = self.renderer.relations();
        match class {
            Some(class) => {
                if relations.contains(class) && self.has_member(class, member) {
                    let text = format!("{class}.{member}");
                    return Some(self.renderer.link(class, Some(member), &text, None, None));
                }
                let missing = if relations.contains(class) {
                    "member"
                } else {
                    "class"
                };
                self.report(&format!("{class}#{member} links to non-existing {missing}"));
                None
            }
            None => {
                if !self.class_context.is_empty() && self.has_member(self.class_context, member) {
                    return Some(self.renderer.link(
                        self.class_context,
                        Some(member),
                        member,
                        None,
                        None,
                    ));
                }
                let ignored = is_hex_color(member)
                    || member.starts_with(|ch: char| ch.is_ascii_digit());
                if !ignored {
                    self.report(&format!("#{member} links to non-existing member"));
                }
                None
            }
        }
    }

    fn resolve_dotted(&self, name: &str) -> Option<String> {
        let relations = self.renderer.relations();
        let namespace = name.split('.').next().unwrap_or(name);
        if !relations.namespaces().contains(namespace) {
            return None;
        }

        if relations.contains(name) {
            return Some(self.renderer.link(name, None, name, None, None));
        }

        if let Some((class, member)) = name.rsplit_once('.')
            && relations.contains(class)
            && self.has_member(class, member)
        {
            return Some(self.renderer.link(class, Some(member), name, None, None));
        }

        if !FILE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            self.report(&format!("{name} links to non-existing class"));
        }
        None
    }

    fn report(&self, message: &str) {
        debug!(
            file = %self.doc_context.filename,
            line = self.doc_context.line,
            "auto-link: {}",
            message
        );
    }
}
