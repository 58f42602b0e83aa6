//! # feedmark
//!
//! Convert feed-flavored HTML to Markdown.
//!
//! Social and content feeds emit a narrow dialect of HTML: headings,
//! paragraphs, emphasis, links, images with `srcset`, figures with captions,
//! fenced code blocks with language hints, lists, blockquotes, and horizontal
//! rules. This crate walks the parsed tree of such a document and renders it
//! as Markdown.
//!
//! ## Design
//!
//! Parsing is delegated to [`scraper`] (html5ever); the engine only walks the
//! resulting tree. Each conversion owns its own output buffer and spacing
//! state, so a fresh [`FeedDocument`] per document is all that concurrent
//! callers need.
//!
//! Anything outside the feed dialect falls through to a default
//! "preserve text, recurse into children" path rather than being dropped.
//!
//! ## Example
//!
//! ```rust
//! use feedmark::FeedDocument;
//!
//! let mut document = FeedDocument::new("<h1>Hello <em>World</em></h1>");
//! document.parse();
//!
//! let markdown = document.as_markdown().unwrap();
//! assert_eq!(markdown, "# Hello *World*");
//! ```

mod convert;
mod document;
mod tag;
mod utilities;

pub use convert::{Conversion, DomRef};
pub use document::FeedDocument;

/// Error type for conversion operations.
///
/// The taxonomy is deliberately narrow: missing attributes and unmatched
/// language classes degrade silently during the walk (see [`Conversion`]),
/// they never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The document has not been parsed yet; call
    /// [`FeedDocument::parse`] first.
    #[error("document not initialized: call parse() before converting")]
    DocumentNotInitialized,
}

pub type Result<T> = std::result::Result<T, ConversionError>;
