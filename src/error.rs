//! Error types for formatting operations
//!
//! The scanner itself never fails: unknown or malformed tags pass through.
//! Errors only come from the edges of the crate (decoding source bytes,
//! configuring templates, parsing member kind names).

use thiserror::Error;

/// Errors that can occur while configuring a formatter or preparing input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Source bytes could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// Unrecognized member kind name
    #[error("Unknown member kind: {0}")]
    UnknownMemberKind(String),
    /// Template is missing a mandatory placeholder
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            FormatError::Encoding("bad byte".to_string()).to_string(),
            "Encoding error: bad byte"
        );
        assert_eq!(
            FormatError::UnknownMemberKind("widget".to_string()).to_string(),
            "Unknown member kind: widget"
        );
        assert_eq!(
            FormatError::InvalidTemplate("missing %a".to_string()).to_string(),
            "Invalid template: missing %a"
        );
    }
}
