//! Visible character counting
//!
//! Lengths used by the shortener are measured in Unicode scalar values, not
//! bytes, so a multi-byte sequence such as `é` or `。` counts as one unit.

/// Count the characters in `text`
///
/// # Examples
///
/// ```rust
/// use doc_comment_formatter::char_count::char_count;
///
/// assert_eq!(char_count("abc"), 3);
/// assert_eq!(char_count("日本語"), 3);
/// ```
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Return the prefix of `text` holding at most `limit` characters
///
/// The cut always lands on a character boundary.
///
/// # Examples
///
/// ```rust
/// use doc_comment_formatter::char_count::take_chars;
///
/// assert_eq!(take_chars("héllo", 2), "hé");
/// assert_eq!(take_chars("abc", 10), "abc");
/// ```
pub fn take_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ascii_count() {
        assert_eq!(char_count(""), 0);
        assert_eq!(char_count("This is a test."), 15);
    }

    #[test]
    fn test_multibyte_count() {
        assert_eq!(char_count("café"), 4);
        assert_eq!(char_count("🎉🎊🎈🎁"), 4);
        assert_eq!(char_count("Hello 世界"), 8);
        assert_eq!(char_count("終わり。"), 4);
    }

    #[test]
    fn test_take_chars_boundaries() {
        assert_eq!(take_chars("", 3), "");
        assert_eq!(take_chars("abc", 0), "");
        assert_eq!(take_chars("abc", 3), "abc");
        assert_eq!(take_chars("世界世界", 3), "世界世");
    }

    proptest! {
        #[test]
        fn prop_count_matches_char_iteration(chars in prop::collection::vec(any::<char>(), 0..256)) {
            let text: String = chars.iter().collect();
            prop_assert_eq!(char_count(&text), chars.len());
        }

        #[test]
        fn prop_take_chars_is_bounded_prefix(
            chars in prop::collection::vec(any::<char>(), 0..128),
            limit in 0usize..160,
        ) {
            let text: String = chars.iter().collect();
            let prefix = take_chars(&text, limit);

            prop_assert!(text.starts_with(prefix));
            prop_assert_eq!(char_count(prefix), limit.min(chars.len()));
        }
    }
}
