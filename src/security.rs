//! URL validation for generated markup
//!
//! Image and video tags turn author-supplied URLs into `src` attributes.
//! URLs with executable or local schemes are refused before they reach the
//! output. This is not a general HTML sanitizer: markup already present in
//! the comment passes through untouched.

/// URL schemes that are never emitted into generated markup
const DANGEROUS_URL_SCHEMES: &[&str] = &[
    "javascript:", // JavaScript execution
    "data:",       // Can contain executable content
    "vbscript:",   // VBScript execution (legacy IE)
    "file:",       // Local file access
    "about:",      // Browser internal URLs
];

/// Validator for URLs placed into generated `src` attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl UrlValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Check if a URL uses a dangerous scheme
    ///
    /// Leading whitespace and embedded ASCII control characters are ignored,
    /// so `" java\tscript:"` is caught as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_comment_formatter::security::UrlValidator;
    ///
    /// let validator = UrlValidator::new();
    /// assert!(validator.is_dangerous_url("javascript:alert('xss')"));
    /// assert!(validator.is_dangerous_url("DATA:text/html,<b>x</b>"));
    /// assert!(!validator.is_dangerous_url("images/diagram.png"));
    /// ```
    pub fn is_dangerous_url(&self, url: &str) -> bool {
        let normalized: String = url
            .trim()
            .chars()
            .filter(|ch| !ch.is_ascii_control())
            .flat_map(char::to_lowercase)
            .collect();
        DANGEROUS_URL_SCHEMES
            .iter()
            .any(|scheme| normalized.starts_with(scheme))
    }

    /// Return the URL when it is safe to emit, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_comment_formatter::security::UrlValidator;
    ///
    /// let validator = UrlValidator::new();
    /// assert_eq!(validator.sanitize_url("javascript:alert(1)"), None);
    /// assert_eq!(validator.sanitize_url("https://example.com/a.mp4"), Some("https://example.com/a.mp4"));
    /// ```
    pub fn sanitize_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        if self.is_dangerous_url(url) {
            None
        } else {
            Some(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dangerous_schemes() {
        let validator = UrlValidator::new();
        for url in [
            "javascript:void(0)",
            "  JavaScript:alert(1)",
            "java\tscript:alert(1)",
            "data:image/svg+xml;base64,AAAA",
            "vbscript:msgbox",
            "file:///etc/passwd",
            "about:blank",
        ] {
            assert!(validator.is_dangerous_url(url), "{url} should be refused");
        }
    }

    #[test]
    fn test_safe_urls() {
        let validator = UrlValidator::new();
        for url in [
            "diagram.png",
            "/images/diagram.png",
            "https://example.com/movie.mp4",
            "12345678",
            "javascript-guide.png",
        ] {
            assert_eq!(validator.sanitize_url(url), Some(url));
        }
    }

    proptest! {
        #[test]
        fn prop_relative_paths_are_safe(path in "[a-z0-9_/-]{1,40}\\.(png|gif|jpg)") {
            prop_assert!(!UrlValidator::new().is_dangerous_url(&path));
        }
    }
}
