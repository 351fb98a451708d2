//! Advance-only scan cursor
//!
//! The cursor wraps an immutable input string and a byte position. Every
//! consuming method moves the position forward by the length of what it
//! returns; nothing moves it back. Matchers probe with [`ScanCursor::check`]
//! and only call [`ScanCursor::scan`] when they are going to consume.
//!
//! Patterns handed to `check`/`scan` must be anchored with `\A` so they can
//! only match at the current position.

use regex::{Captures, Regex};

/// Position within an input string that only ever moves forward
#[derive(Debug, Clone)]
pub struct ScanCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ScanCursor<'a> {
    /// Create a cursor at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset into the input
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every byte has been consumed
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Unconsumed remainder of the input
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Test whether the anchored pattern matches at the current position
    pub fn check(&self, pattern: &Regex) -> bool {
        pattern.is_match(self.rest())
    }

    /// Test whether the remainder starts with a literal
    pub fn check_str(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Captures of the anchored pattern at the current position, without
    /// consuming anything
    ///
    /// Empty matches are treated as no match.
    pub fn peek(&self, pattern: &Regex) -> Option<Captures<'a>> {
        let caps = pattern.captures(self.rest())?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() == 0 {
            return None;
        }
        Some(caps)
    }

    /// Consume the anchored pattern if it matches at the current position
    ///
    /// Returns the captures of the match, or `None` without moving.
    pub fn scan(&mut self, pattern: &Regex) -> Option<Captures<'a>> {
        let caps = self.peek(pattern)?;
        self.accept(&caps);
        Some(caps)
    }

    /// Consume the text of a match previously returned by [`ScanCursor::peek`]
    pub fn accept(&mut self, caps: &Captures<'a>) -> &'a str {
        let len = caps.get(0).map_or(0, |whole| whole.end());
        self.take(len)
    }

    /// Consume a literal if the remainder starts with it
    pub fn scan_str(&mut self, literal: &str) -> Option<&'a str> {
        if literal.is_empty() || !self.check_str(literal) {
            return None;
        }
        Some(self.take(literal.len()))
    }

    /// Consume through the next occurrence of `delimiter` (inclusive), or to
    /// the end of input when the delimiter never appears
    pub fn scan_through(&mut self, delimiter: char) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(delimiter)
            .map_or(rest.len(), |idx| idx + delimiter.len_utf8());
        self.take(len)
    }

    /// Consume the longest prefix whose characters all satisfy `keep`
    pub fn scan_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, ch)| !keep(ch))
            .map_or(rest.len(), |(idx, _)| idx);
        self.take(len)
    }

    /// Consume exactly one character
    pub fn scan_char(&mut self) -> Option<&'a str> {
        let ch = self.rest().chars().next()?;
        Some(self.take(ch.len_utf8()))
    }

    fn take(&mut self, len: usize) -> &'a str {
        let start = self.pos;
        self.pos += len;
        &self.input[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scan_consumes_anchored_match() {
        let pattern = Regex::new(r"\A\{@(\w+)").unwrap();
        let mut cursor = ScanCursor::new("{@link Foo}");
        assert!(cursor.check(&pattern));

        let caps = cursor.scan(&pattern).unwrap();
        assert_eq!(&caps[1], "link");
        assert_eq!(cursor.rest(), " Foo}");
    }

    #[test]
    fn test_scan_does_not_move_on_miss() {
        let pattern = Regex::new(r"\A<a\b").unwrap();
        let mut cursor = ScanCursor::new("<abbr>");
        assert!(cursor.scan(&pattern).is_none());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_peek_then_accept() {
        let pattern = Regex::new(r"\A\{@video\s+(\w+)").unwrap();
        let mut cursor = ScanCursor::new("{@video html5 a.mp4}");
        let caps = cursor.peek(&pattern).unwrap();
        assert_eq!(cursor.position(), 0);
        assert_eq!(&caps[1], "html5");

        assert_eq!(cursor.accept(&caps), "{@video html5");
        assert_eq!(cursor.rest(), " a.mp4}");
    }

    #[test]
    fn test_scan_through_delimiter() {
        let mut cursor = ScanCursor::new("<b>bold</b>");
        assert_eq!(cursor.scan_through('>'), "<b>");
        assert_eq!(cursor.rest(), "bold</b>");
    }

    #[test]
    fn test_scan_through_unterminated() {
        let mut cursor = ScanCursor::new("<div");
        assert_eq!(cursor.scan_through('>'), "<div");
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_scan_while_multibyte() {
        let mut cursor = ScanCursor::new("日本語{x}");
        assert_eq!(cursor.scan_while(|ch| ch != '{'), "日本語");
        assert_eq!(cursor.scan_char(), Some("{"));
        assert_eq!(cursor.scan_str("x}"), Some("x}"));
        assert!(cursor.is_eof());
        assert_eq!(cursor.scan_char(), None);
    }

    proptest! {
        #[test]
        fn prop_position_never_decreases(input in ".{0,64}", steps in prop::collection::vec(0u8..3, 0..32)) {
            let mut cursor = ScanCursor::new(&input);
            let mut consumed = String::new();
            let mut last = cursor.position();

            for step in steps {
                let piece = match step {
                    0 => cursor.scan_char().unwrap_or(""),
                    1 => cursor.scan_through('>'),
                    _ => cursor.scan_while(char::is_alphanumeric),
                };
                consumed.push_str(piece);
                prop_assert!(cursor.position() >= last);
                last = cursor.position();
            }

            consumed.push_str(cursor.rest());
            prop_assert_eq!(consumed, input);
        }
    }
}
