//! Documentation Comment Formatter
//!
//! This library renders raw API documentation comments into HTML fragments.
//! Comments are Markdown with embedded inline tags:
//!
//! - `{@link Class#member text}`: links to classes and members
//! - `{@img path alt}`: images, collected for copying into the output
//! - `{@video type url alt}`: embedded videos
//! - `@example` at the top of a code block: runnable example markup
//!
//! Class and member names in plain text are linked automatically, and
//! [`DocFormatter::shorten`] produces bounded one-sentence summaries for
//! listing views.
//!
//! # Architecture
//!
//! - `formatter`: configuration and public entry points
//! - `scanner`: single-pass inline tag scanner
//! - `inline`: tag matchers and auto-linking
//! - `relations`: class/member lookup table
//! - `markdown`: `<pre>` normalization and the Markdown renderer
//! - `shorten`: sentence-aware summaries
//! - `char_count`: character (not byte) counting
//! - `html`: tag stripping and escaping
//! - `charset`: decoding of non-UTF-8 sources
//! - `cache`: BLAKE3-keyed render cache
//! - `security`: URL checks for generated markup
//! - `cursor`: advance-only scan cursor

pub mod cache;
pub mod char_count;
pub mod charset;
pub mod cursor;
pub mod error;
pub mod formatter;
pub mod html;
pub mod inline;
pub mod markdown;
pub mod relations;
pub mod scanner;
pub mod security;
pub mod shorten;

// Re-export main types for convenience
pub use error::FormatError;
pub use formatter::{DocFormatter, FormatterOptions, ImageCollector};
pub use inline::{DocContext, ImageRef};
pub use relations::{ClassInfo, Member, MemberKind, Relations};
pub use scanner::Rendered;
