//! `{@link}` tags and link construction
//!
//! A link target is `Class`, `Class#member` or `#member`. The member part
//! may carry a kind and a static marker to disambiguate overloaded names:
//! `Ext.Panel#static-method-create`, `Ext.Panel#event-show`.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::{DocContext, InlineMatcher, cached_regex, fill_template};
use crate::cursor::ScanCursor;
use crate::error::FormatError;
use crate::relations::{MemberKind, MemberQuery, Relations};
use crate::scanner::ScanState;

/// Default link markup
pub const DEFAULT_LINK_TEMPLATE: &str =
    "<a href=\"#!/api/%c%-%m\" rel=\"%c%-%m\" class=\"docClass\">%a</a>";

fn link_pattern() -> Option<&'static Regex> {
    static LINK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&LINK_REGEX, r"(?s)\A\{@link\s+(\S+?)(?:\s+(.+?))?\}")
}

fn target_pattern() -> Option<&'static Regex> {
    static TARGET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(
        &TARGET_REGEX,
        r"\A(.*)#(static-)?(?:(cfg|property|method|event|css_var|css_mixin)-)?(.*)\z",
    )
}

/// Check that a link template produces visible text
pub fn validate_link_template(template: &str) -> Result<(), FormatError> {
    if template.contains("%a") {
        Ok(())
    } else {
        Err(FormatError::InvalidTemplate(format!(
            "link template must contain %a: {template}"
        )))
    }
}

/// Builds link markup from a template
#[derive(Debug, Clone, Copy)]
pub struct LinkRenderer<'a> {
    relations: &'a Relations,
    template: &'a str,
}

impl<'a> LinkRenderer<'a> {
    /// Create a renderer over `relations` using `template`
    pub fn new(relations: &'a Relations, template: &'a str) -> Self {
        Self {
            relations,
            template,
        }
    }

    /// The relations table links are resolved against
    pub fn relations(&self) -> &'a Relations {
        self.relations
    }

    /// Render a link to a class or one of its members
    ///
    /// The class name is replaced by its canonical name when it is an
    /// alternate name. When the member cannot be found the link points at
    /// the class itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use doc_comment_formatter::inline::LinkRenderer;
    /// use doc_comment_formatter::inline::link::DEFAULT_LINK_TEMPLATE;
    /// use doc_comment_formatter::relations::{ClassInfo, Member, Relations};
    ///
    /// let relations = Relations::new([ClassInfo::new("Ext.Panel").member(Member::method("show"))]);
    /// let renderer = LinkRenderer::new(&relations, DEFAULT_LINK_TEMPLATE);
    /// assert_eq!(
    ///     renderer.link("Ext.Panel", Some("show"), "show()", None, None),
    ///     "<a href=\"#!/api/Ext.Panel-method-show\" rel=\"Ext.Panel-method-show\" class=\"docClass\">show()</a>"
    /// );
    /// ```
    pub fn link(
        &self,
        class: &str,
        member: Option<&str>,
        anchor_text: &str,
        kind: Option<MemberKind>,
        is_static: Option<bool>,
    ) -> String {
        let class_name = self
            .relations
            .get(class)
            .map_or(class, |info| info.name.as_str());

        let member_id = member.and_then(|name| {
            let query = MemberQuery {
                name,
                kind,
                is_static,
            };
            self.relations
                .find_members(class_name, &query)
                .first()
                .map(|found| found.id())
        });

        fill_template(self.template, |placeholder| match placeholder {
            "%c" => Some(class_name.to_string()),
            "%m" => Some(member_id.clone().unwrap_or_default()),
            "%#" => Some(if member_id.is_some() { "#" } else { "" }.to_string()),
            "%-" => Some(if member_id.is_some() { "-" } else { "" }.to_string()),
            "%a" => Some(anchor_text.to_string()),
            _ => None,
        })
        .into_owned()
    }
}

/// Parsed link target
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkTarget<'t> {
    class: &'t str,
    member: Option<&'t str>,
    kind: Option<MemberKind>,
    is_static: Option<bool>,
}

/// Matcher for `{@link target text}`
pub struct InlineLink<'a> {
    renderer: LinkRenderer<'a>,
    class_context: &'a str,
    doc_context: &'a DocContext,
}

impl<'a> InlineLink<'a> {
    /// Create a matcher resolving `#member` against `class_context`
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

    fn parse_target<'t>(&self, target: &'t str) -> LinkTarget<'t>
    where
        'a: 't,
    {
        let parsed = target_pattern().and_then(|pattern| pattern.captures(target));
        match parsed {
            Some(caps) => {
                let class = caps.get(1).map_or("", |m| m.as_str());
                LinkTarget {
                    class: if class.is_empty() {
                        self.class_context
                    } else {
                        class
                    },
                    member: caps.get(4).map(|m| m.as_str()),
                    kind: caps.get(3).and_then(|m| m.as_str().parse().ok()),
                    is_static: caps.get(2).map(|_| true),
                }
            }
            None => LinkTarget {
                class: target,
                member: None,
                kind: None,
                is_static: None,
            },
        }
    }

    fn apply(&self, target: &str, text: Option<&str>, full_tag: &str) -> String {
        let target = self.parse_target(target);

        let text = match (text, target.member) {
            (Some(text), _) => text.to_string(),
            (None, Some(member)) if target.class == self.class_context => member.to_string(),
            (None, Some(member)) => format!("{}.{}", target.class, member),
            (None, None) => target.class.to_string(),
        };

        let relations = self.renderer.relations();
        if !relations.contains(target.class) {
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "{} links to non-existing class",
                full_tag
            );
            return text;
        }

        let Some(member) = target.member else {
            return self.renderer.link(target.class, None, &text, None, None);
        };

        let query = MemberQuery {
            name: member,
            kind: target.kind,
            is_static: target.is_static,
        };
        let found = relations.find_members(target.class, &query);
        if found.is_empty() {
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "{} links to non-existing member",
                full_tag
            );
            return text;
        }
        if found.len() > 1 {
            let alternatives: Vec<String> = found.iter().map(|m| m.id()).collect();
            warn!(
                file = %self.doc_context.filename,
                line = self.doc_context.line,
                "{} is ambiguous: {}",
                full_tag,
                alternatives.join(", ")
            );
        }

        self.renderer.link(
            target.class,
            Some(member),
            &text,
            target.kind,
            target.is_static,
        )
    }
}

impl InlineMatcher for InlineLink<'_> {
    fn try_consume(&self, cursor: &mut ScanCursor<'_>, _state: &mut ScanState) -> Option<String> {
        let caps = cursor.scan(link_pattern()?)?;
        let full_tag = caps.get(0).map_or("", |m| m.as_str());
        let target = caps.get(1).map_or("", |m| m.as_str());
        let text = caps.get(2).map(|m| m.as_str());
        Some(self.apply(target, text, full_tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::{ClassInfo, Member};

    fn relations() -> Relations {
        Relations::new([
            ClassInfo::new("Ext.panel.Panel")
                .alternate_name("Ext.Panel")
                .member(Member::method("show"))
                .member(Member::event("show"))
                .member(Member::method("create").into_static())
                .member(Member::cfg("title")),
            ClassInfo::new("Ext.Button"),
        ])
    }

    fn consume(input: &str, relations: &Relations, class_context: &str) -> (Option<String>, String) {
        let doc_context = DocContext::default();
        let renderer = LinkRenderer::new(relations, "<%c|%#|%m|%a>");
        let matcher = InlineLink::new(renderer, class_context, &doc_context);
        let mut cursor = ScanCursor::new(input);
        let mut state = ScanState::default();
        let out = matcher.try_consume(&mut cursor, &mut state);
        (out, cursor.rest().to_string())
    }

    #[test]
    fn test_link_to_class() {
        let rel = relations();
        let (out, rest) = consume("{@link Ext.Button} tail", &rel, "");
        assert_eq!(out.as_deref(), Some("<Ext.Button|||Ext.Button>"));
        assert_eq!(rest, " tail");
    }

    #[test]
    fn test_link_with_text() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.Button the button}", &rel, "");
        assert_eq!(out.as_deref(), Some("<Ext.Button|||the button>"));
    }

    #[test]
    fn test_link_alternate_name_is_canonicalized() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.Panel#cfg-title}", &rel, "");
        assert_eq!(
            out.as_deref(),
            Some("<Ext.panel.Panel|#|cfg-title|Ext.Panel.title>")
        );
    }

    #[test]
    fn test_link_member_in_class_context() {
        let rel = relations();
        let (out, _) = consume("{@link #title}", &rel, "Ext.panel.Panel");
        assert_eq!(out.as_deref(), Some("<Ext.panel.Panel|#|cfg-title|title>"));
    }

    #[test]
    fn test_link_kind_disambiguates() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.panel.Panel#event-show}", &rel, "");
        assert_eq!(
            out.as_deref(),
            Some("<Ext.panel.Panel|#|event-show|Ext.panel.Panel.show>")
        );
    }

    #[test]
    fn test_link_static_member() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.panel.Panel#static-method-create make}", &rel, "");
        assert_eq!(
            out.as_deref(),
            Some("<Ext.panel.Panel|#|static-method-create|make>")
        );
    }

    #[test]
    fn test_link_ambiguous_member_uses_first() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.panel.Panel#show}", &rel, "");
        assert_eq!(
            out.as_deref(),
            Some("<Ext.panel.Panel|#|method-show|Ext.panel.Panel.show>")
        );
    }

    #[test]
    fn test_link_missing_class_keeps_text() {
        let rel = relations();
        let (out, rest) = consume("{@link Ext.Missing see this}!", &rel, "");
        assert_eq!(out.as_deref(), Some("see this"));
        assert_eq!(rest, "!");
    }

    #[test]
    fn test_link_missing_member_keeps_text() {
        let rel = relations();
        let (out, _) = consume("{@link Ext.Button#press}", &rel, "");
        assert_eq!(out.as_deref(), Some("Ext.Button.press"));
    }

    #[test]
    fn test_declines_non_link() {
        let rel = relations();
        for input in ["{@img a.png}", "{@link}", "{ plain }", "text"] {
            let (out, rest) = consume(input, &rel, "");
            assert_eq!(out, None);
            assert_eq!(rest, input);
        }
    }

    #[test]
    fn test_renderer_falls_back_to_class_link() {
        let rel = relations();
        let renderer = LinkRenderer::new(&rel, DEFAULT_LINK_TEMPLATE);
        assert_eq!(
            renderer.link("Ext.Panel", Some("missing"), "x", None, None),
            "<a href=\"#!/api/Ext.panel.Panel\" rel=\"Ext.panel.Panel\" class=\"docClass\">x</a>"
        );
    }

    #[test]
    fn test_validate_link_template() {
        assert!(validate_link_template(DEFAULT_LINK_TEMPLATE).is_ok());
        assert!(matches!(
            validate_link_template("<a href=\"%c\"></a>"),
            Err(FormatError::InvalidTemplate(_))
        ));
    }
}
