//! Closed set of element tags the converter formats.

/// Tags with dedicated formatting rules.
///
/// Every element the walker handles gets its own variant so the dispatch in
/// [`crate::Conversion`] is an exhaustive match; anything else maps to
/// [`Tag::Other`] and takes the default text-plus-children path. Adding
/// support for a new element means adding a variant here, not another string
/// comparison at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    /// `h1` through `h6`, carrying the heading level.
    Heading(u8),
    Paragraph,
    LineBreak,
    Anchor,
    Strong,
    Emphasis,
    Code,
    Preformatted,
    Figure,
    Span,
    Caption,
    Image,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    Divider,
    /// Any element without a dedicated rule.
    Other,
}

impl Tag {
    /// Map a lowercase element name to its tag variant.
    pub(crate) fn from_name(name: &str) -> Self {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "br" => Tag::LineBreak,
            "a" => Tag::Anchor,
            "strong" => Tag::Strong,
            "em" => Tag::Emphasis,
            "code" => Tag::Code,
            "pre" => Tag::Preformatted,
            "figure" => Tag::Figure,
            "span" => Tag::Span,
            "figcaption" => Tag::Caption,
            "img" => Tag::Image,
            "blockquote" => Tag::Blockquote,
            "ul" => Tag::BulletList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "hr" => Tag::Divider,
            _ => Tag::Other,
        }
    }
}
