//! Document lifecycle: raw HTML in, Markdown out.

use scraper::Html;

use crate::convert::{Conversion, DomRef};
use crate::utilities::collapse_whitespace;
use crate::{ConversionError, Result};

/// Returned instead of an error when the parsed document has no `body`.
const MISSING_BODY_PLACEHOLDER: &str = "Document Not Initialized";

/// One feed document: the raw HTML and, once [`parse`](Self::parse) has run,
/// its tree.
///
/// The tree is not shareable across threads, so construct a fresh
/// `FeedDocument` per document; each [`as_markdown`](Self::as_markdown) call
/// runs its own [`Conversion`] and no state survives between calls.
pub struct FeedDocument {
    raw_html: String,
    document: Option<Html>,
}

impl FeedDocument {
    pub fn new(raw_html: impl Into<String>) -> Self {
        Self {
            raw_html: raw_html.into(),
            document: None,
        }
    }

    /// Parse the raw HTML. Must be called before [`as_markdown`](Self::as_markdown).
    ///
    /// html5ever error-corrects malformed markup rather than failing, so
    /// this always succeeds.
    pub fn parse(&mut self) {
        self.document = Some(Html::parse_document(&self.raw_html));
    }

    /// Render the document body as Markdown, trimmed of surrounding
    /// whitespace.
    ///
    /// Fails with [`ConversionError::DocumentNotInitialized`] when called
    /// before [`parse`](Self::parse); a parsed document without a `body`
    /// degrades to a fixed placeholder string instead.
    pub fn as_markdown(&self) -> Result<String> {
        let document = self
            .document
            .as_ref()
            .ok_or(ConversionError::DocumentNotInitialized)?;

        let Some(body) = body_node(document) else {
            return Ok(MISSING_BODY_PLACEHOLDER.to_string());
        };

        let mut conversion = Conversion::new();
        conversion.convert(body);
        Ok(conversion.finish())
    }

    /// The document's plain text, whitespace-normalized.
    pub fn raw_text(&self) -> Result<String> {
        let document = self
            .document
            .as_ref()
            .ok_or(ConversionError::DocumentNotInitialized)?;

        let mut text = String::new();
        for node in document.tree.root().descendants() {
            if let Some(fragment) = node.value().as_text() {
                text.push_str(fragment);
            }
        }
        Ok(collapse_whitespace(&text).trim().to_string())
    }
}

fn body_node(document: &Html) -> Option<DomRef<'_>> {
    document.tree.root().descendants().find(|node| {
        node.value()
            .as_element()
            .map(|e| e.name() == "body")
            .unwrap_or(false)
    })
}
