//! Class and member lookup table
//!
//! Link resolution needs to know which classes exist and which members they
//! carry. [`Relations`] answers those questions, following alternate class
//! names to the canonical class and walking mixins and ancestors when
//! looking up members.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Kind of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Configuration option
    Cfg,
    /// Property
    Property,
    /// Method
    Method,
    /// Event
    Event,
    /// CSS variable
    CssVar,
    /// CSS mixin
    CssMixin,
}

impl MemberKind {
    /// Name used in member ids and link targets
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Cfg => "cfg",
            MemberKind::Property => "property",
            MemberKind::Method => "method",
            MemberKind::Event => "event",
            MemberKind::CssVar => "css_var",
            MemberKind::CssMixin => "css_mixin",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cfg" => Ok(MemberKind::Cfg),
            "property" => Ok(MemberKind::Property),
            "method" => Ok(MemberKind::Method),
            "event" => Ok(MemberKind::Event),
            "css_var" => Ok(MemberKind::CssVar),
            "css_mixin" => Ok(MemberKind::CssMixin),
            other => Err(FormatError::UnknownMemberKind(other.to_string())),
        }
    }
}

/// A documented class member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
}

impl Member {
    /// Create an instance member
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
        }
    }

    /// A method
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Method)
    }

    /// A config option
    pub fn cfg(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Cfg)
    }

    /// A property
    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Property)
    }

    /// An event
    pub fn event(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Event)
    }

    /// Mark the member as static
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Anchor id of the member, e.g. `method-show` or `static-method-create`
    pub fn id(&self) -> String {
        if self.is_static {
            format!("static-{}-{}", self.kind, self.name)
        } else {
            format!("{}-{}", self.kind, self.name)
        }
    }
}

/// A documented class
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassInfo {
    pub name: String,
    pub alternate_names: Vec<String>,
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub members: Vec<Member>,
}

impl ClassInfo {
    /// A class with no members, parent or mixins
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a name the class can also be referenced by
    pub fn alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_names.push(name.into());
        self
    }

    /// Set the parent class
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add a mixin class
    pub fn mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    /// Add a member
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// Criteria for a member lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberQuery<'q> {
    pub name: &'q str,
    pub kind: Option<MemberKind>,
    pub is_static: Option<bool>,
}

impl<'q> MemberQuery<'q> {
    /// Match any member with the given name
    pub fn named(name: &'q str) -> Self {
        Self {
            name,
            kind: None,
            is_static: None,
        }
    }

    fn accepts(&self, member: &Member) -> bool {
        member.name == self.name
            && self.kind.is_none_or(|kind| kind == member.kind)
            && self.is_static.is_none_or(|is_static| is_static == member.is_static)
    }
}

/// Lookup table of all known classes
#[derive(Debug, Clone, Default)]
pub struct Relations {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, usize>,
    namespaces: BTreeSet<String>,
}

impl Relations {
    /// Build the table; a later class with an already-seen name wins
    pub fn new(classes: impl IntoIterator<Item = ClassInfo>) -> Self {
        let mut relations = Self::default();
        for class in classes {
            relations.insert(class);
        }
        relations
    }

    fn insert(&mut self, class: ClassInfo) {
        let index = self.classes.len();
        if let Some(namespace) = class.name.split('.').next() {
            self.namespaces.insert(namespace.to_string());
        }
        self.by_name.insert(class.name.clone(), index);
        for alternate in &class.alternate_names {
            self.by_name.entry(alternate.clone()).or_insert(index);
        }
        self.classes.push(class);
    }

    /// True when no class is known; auto-linking is skipped then
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up a class by canonical or alternate name
    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.by_name.get(name).map(|&index| &self.classes[index])
    }

    /// True for canonical and alternate class names
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// First dotted segment of every class name
    pub fn namespaces(&self) -> &BTreeSet<String> {
        &self.namespaces
    }

    /// All members of `class` matching `query`, own members first
    ///
    /// Mixins are searched before ancestors. A member inherited under the
    /// same id as one already found is skipped.
    pub fn find_members(&self, class: &str, query: &MemberQuery<'_>) -> Vec<&Member> {
        let mut found: Vec<&Member> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut visited = HashSet::new();
        let mut pending = vec![class.to_string()];

        while let Some(name) = pending.pop() {
            let Some(info) = self.get(&name) else {
                continue;
            };
            if !visited.insert(info.name.clone()) {
                continue;
            }

            for member in info.members.iter().filter(|m| query.accepts(m)) {
                if seen_ids.insert(member.id()) {
                    found.push(member);
                }
            }

            // Stack order: parent is visited after mixins
            if let Some(parent) = &info.extends {
                pending.push(parent.clone());
            }
            pending.extend(info.mixins.iter().rev().cloned());
        }

        found
    }

    /// Stable text fingerprint of the table contents
    pub fn fingerprint(&self) -> String {
        let mut parts: Vec<String> = self
            .classes
            .iter()
            .map(|class| {
                let mut members: Vec<String> = class.members.iter().map(Member::id).collect();
                members.sort();
                format!(
                    "{}|{}|{}|{}|{}",
                    class.name,
                    class.alternate_names.join(","),
                    class.extends.as_deref().unwrap_or(""),
                    class.mixins.join(","),
                    members.join(",")
                )
            })
            .collect();
        parts.sort();
        parts.join("\n")
    }
}
