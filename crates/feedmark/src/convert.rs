//! The recursive node-to-Markdown conversion engine.

use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::Node;

use crate::tag::Tag;
use crate::utilities::{collapse_whitespace, extract_url, language_hint};

/// Borrowed handle into a parsed HTML tree.
pub type DomRef<'a> = NodeRef<'a, Node>;

/// One in-flight conversion: the output buffer plus the traversal state.
///
/// The walk is depth-first and pre-order, dispatching on each element's tag
/// and appending Markdown fragments to an append-only buffer. State
/// never outlives the conversion; independent documents get independent
/// `Conversion` values. The enclosing `figure` element is passed down the
/// recursion as a value-scoped parameter, so it reverts automatically when
/// the walk leaves the figure's subtree.
#[derive(Debug, Default)]
pub struct Conversion {
    markdown: String,
    has_spaced_paragraph: bool,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a node and its subtree, appending to the buffer.
    ///
    /// Entry point; usually invoked once on the document's `body`.
    pub fn convert(&mut self, node: DomRef<'_>) {
        self.convert_node(node, None, 0, None);
    }

    /// The accumulated buffer, before the final trim.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Consume the conversion and return the buffer trimmed of surrounding
    /// whitespace and newlines.
    pub fn finish(self) -> String {
        self.markdown.trim().to_string()
    }

    fn convert_node<'t>(
        &mut self,
        node: DomRef<'t>,
        parent: Option<DomRef<'t>>,
        index: usize,
        figure: Option<DomRef<'t>>,
    ) {
        let mut figure = figure;

        if let Some(element) = node.value().as_element() {
            let parent_tag = parent
                .and_then(|p| p.value().as_element())
                .map(|e| Tag::from_name(e.name()));

            match Tag::from_name(element.name()) {
                Tag::Heading(level) => {
                    self.markdown.push_str(&"#".repeat(usize::from(level)));
                    self.markdown.push(' ');
                    self.convert_children(node, figure);
                    self.markdown.push_str("\n\n");
                    return;
                }

                // The first spacing-requiring block at this level emits no
                // leading blank; later ones separate themselves.
                Tag::Paragraph => {
                    if self.has_spaced_paragraph {
                        self.markdown.push_str("\n\n");
                    } else {
                        self.has_spaced_paragraph = true;
                    }
                }

                Tag::LineBreak => {
                    if self.has_spaced_paragraph {
                        self.markdown.push('\n');
                    } else {
                        self.has_spaced_paragraph = true;
                    }
                }

                Tag::Anchor => {
                    self.markdown.push('[');
                    self.convert_children(node, figure);
                    self.markdown.push(']');
                    self.markdown.push('(');
                    self.markdown.push_str(element.attr("href").unwrap_or(""));
                    self.markdown.push(')');
                    return;
                }

                Tag::Strong => {
                    self.markdown.push_str("**");
                    self.convert_children(node, figure);
                    self.markdown.push_str("**");
                    return;
                }

                Tag::Emphasis => {
                    self.markdown.push('*');
                    self.convert_children(node, figure);
                    self.markdown.push('*');
                    return;
                }

                Tag::Code if parent_tag != Some(Tag::Preformatted) => {
                    self.markdown.push('`');
                    self.convert_children(node, figure);
                    self.markdown.push('`');
                    return;
                }

                Tag::Preformatted => {
                    if let Some(first) = node.first_child() {
                        if self.has_spaced_paragraph {
                            self.markdown.push_str("\n\n");
                        } else {
                            self.has_spaced_paragraph = true;
                        }

                        let first_is_code = first
                            .value()
                            .as_element()
                            .map(|e| Tag::from_name(e.name()) == Tag::Code)
                            .unwrap_or(false);
                        if first_is_code {
                            self.convert_fenced_code(first, figure);
                            return;
                        }
                        // Not a code block; the default path renders the
                        // children without framing.
                    }
                }

                // No direct output; descendants see this node as their
                // figure context.
                Tag::Figure => figure = Some(node),

                // Decorative spans (photo-credit badges) inside a figure.
                Tag::Span if figure.is_some() => return,

                // Captions are consumed by the image handler, never walked
                // independently.
                Tag::Caption if figure.is_some() => return,

                Tag::Image => {
                    match figure {
                        Some(container) => self.convert_figure_image(element, container),
                        None => self.convert_image(element),
                    }
                    return;
                }

                Tag::Blockquote => {
                    self.markdown.push_str("\n\n> ");
                    // The first paragraph inside the quote must not
                    // double-space.
                    self.has_spaced_paragraph = false;
                    self.convert_children(node, figure);
                    self.markdown.push_str("\n\n");
                    return;
                }

                Tag::BulletList | Tag::OrderedList => {
                    self.markdown.push('\n');
                    self.convert_children(node, figure);
                    return;
                }

                Tag::ListItem => {
                    match parent_tag {
                        Some(Tag::BulletList) => {
                            self.markdown.push_str("\n- ");
                            self.convert_children(node, figure);
                        }
                        Some(Tag::OrderedList) => {
                            // Numbering starts at the item's zero-based
                            // index among its parent's children.
                            self.markdown.push_str(&format!("\n{}. ", index));
                            self.convert_children(node, figure);
                        }
                        _ => {}
                    }
                    return;
                }

                Tag::Divider => self.markdown.push_str("\n---\n"),

                _ => {}
            }
        }

        self.convert_text(node);
        self.convert_children(node, figure);
    }

    fn convert_children<'t>(&mut self, node: DomRef<'t>, figure: Option<DomRef<'t>>) {
        for (index, child) in node.children().enumerate() {
            self.convert_node(child, Some(node), index, figure);
        }
    }

    /// Append a text node's content, stripping surrounding newlines.
    ///
    /// Outside `pre`, whitespace runs collapse to a single space first and a
    /// bare inter-element space is dropped entirely. Inside `pre`, text is
    /// taken literally so code keeps its layout.
    fn convert_text(&mut self, node: DomRef<'_>) {
        let Some(text) = node.value().as_text() else {
            return;
        };
        let text: &str = text;

        let preformatted = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| Tag::from_name(e.name()) == Tag::Preformatted)
                .unwrap_or(false)
        });

        if preformatted {
            if text != " " {
                self.markdown.push_str(text.trim_matches('\n'));
            }
            return;
        }

        let collapsed = collapse_whitespace(text);
        if collapsed.is_empty() || collapsed == " " {
            return;
        }
        self.markdown.push_str(collapsed.trim_matches('\n'));
    }

    /// Emit a fenced code block for a `code` element found under `pre`.
    fn convert_fenced_code<'t>(&mut self, code: DomRef<'t>, figure: Option<DomRef<'t>>) {
        self.markdown.push_str("```");

        let language = code
            .value()
            .as_element()
            .and_then(|e| e.attr("class"))
            .and_then(language_hint);
        if let Some(language) = language {
            self.markdown.push_str(&language);
        }
        self.markdown.push('\n');

        self.convert_children(code, figure);
        self.markdown.push_str("\n```");
    }

    /// Emit an image found outside any figure: `src` attribute, `alt` text.
    fn convert_image(&mut self, element: &Element) {
        let Some(url) = element.attr("src").and_then(extract_url) else {
            return;
        };

        self.markdown.push_str("\n![");
        if let Some(alt) = element.attr("alt") {
            self.markdown.push_str(alt.trim());
        }
        self.markdown.push_str("](");
        self.markdown.push_str(&url);
        self.markdown.push_str(")\n");
    }

    /// Emit an image found inside a figure: the last (largest) `srcset`
    /// candidate, captioned by the figure's `figcaption` when present and
    /// by `alt` otherwise.
    fn convert_figure_image(&mut self, element: &Element, figure: DomRef<'_>) {
        let Some(url) = element.attr("srcset").and_then(extract_url) else {
            return;
        };

        self.markdown.push_str("\n![");

        let caption = figure
            .children()
            .find(|child| {
                child
                    .value()
                    .as_element()
                    .map(|e| Tag::from_name(e.name()) == Tag::Caption)
                    .unwrap_or(false)
            })
            .map(caption_text);

        match caption {
            Some(text) => self.markdown.push_str(&text),
            None => {
                if let Some(alt) = element.attr("alt") {
                    self.markdown.push_str(alt.trim());
                }
            }
        }

        self.markdown.push_str("](");
        self.markdown.push_str(&url);
        self.markdown.push_str(")\n");
    }
}

/// Concatenate the trimmed text descendants of a `figcaption`.
fn caption_text(figcaption: DomRef<'_>) -> String {
    figcaption
        .descendants()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn body_of(document: &Html) -> DomRef<'_> {
        document
            .tree
            .root()
            .descendants()
            .find(|node| {
                node.value()
                    .as_element()
                    .map(|e| e.name() == "body")
                    .unwrap_or(false)
            })
            .expect("parsed document has a body")
    }

    /// Converted output after the final trim.
    fn convert(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut conversion = Conversion::new();
        conversion.convert(body_of(&document));
        conversion.finish()
    }

    /// The raw buffer, before the final trim.
    fn buffer(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut conversion = Conversion::new();
        conversion.convert(body_of(&document));
        conversion.markdown().to_string()
    }

    #[test]
    fn test_heading_levels_before_trim() {
        for level in 1..=6usize {
            let html = format!("<h{level}>X</h{level}>");
            assert_eq!(buffer(&html), format!("{} X\n\n", "#".repeat(level)));
        }
    }

    #[test]
    fn test_paragraph_spacing() {
        assert_eq!(convert("<p>A</p><p>B</p>"), "A\n\nB");
        assert_eq!(convert("<p>A</p><p>B</p><p>C</p>"), "A\n\nB\n\nC");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(convert("<p>a<br>b</p>"), "a\nb");
    }

    #[test]
    fn test_emphasis_adjacency() {
        assert_eq!(convert("<p>A<em>B</em>C</p>"), "A*B*C");
        assert_eq!(convert("<p>Love<strong>is</strong>bold</p>"), "Love**is**bold");
    }

    #[test]
    fn test_nested_emphasis_composes() {
        assert_eq!(convert("<em><strong>X</strong></em>"), "***X***");
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(
            convert(r#"<a href="https://example.com">Link</a>"#),
            "[Link](https://example.com)"
        );
    }

    #[test]
    fn test_link_without_href() {
        assert_eq!(convert("<a>Link</a>"), "[Link]()");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(convert("<p>run <code>cargo</code> now</p>"), "run `cargo` now");
    }

    #[test]
    fn test_fenced_code_with_language() {
        assert_eq!(
            convert(r#"<pre><code class="lang-swift">let x = 1</code></pre>"#),
            "```swift\nlet x = 1\n```"
        );
    }

    #[test]
    fn test_fenced_code_without_language() {
        assert_eq!(
            convert("<pre><code>let x = 1</code></pre>"),
            "```\nlet x = 1\n```"
        );
    }

    #[test]
    fn test_fenced_code_keeps_inner_lines() {
        assert_eq!(
            convert("<pre><code>fn main() {\n    body\n}</code></pre>"),
            "```\nfn main() {\n    body\n}\n```"
        );
    }

    #[test]
    fn test_pre_without_leading_code_child() {
        assert_eq!(convert("<pre>x<code>y</code></pre>"), "xy");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(convert("<ul><li>a</li><li>b</li></ul>"), "- a\n- b");
    }

    #[test]
    fn test_ordered_list_numbering_is_zero_based() {
        // Numbering reproduces each item's index among its siblings, so a
        // list deliberately starts at 0 rather than the conventional 1.
        assert_eq!(convert("<ol><li>a</li><li>b</li></ol>"), "0. a\n1. b");
    }

    #[test]
    fn test_list_item_outside_list() {
        assert_eq!(convert("<div><li>x</li></div>"), "");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(convert("<hr>"), "---");
        assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n---\n\n\nb");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            convert("<blockquote><p>Quote</p></blockquote>"),
            "> Quote"
        );
    }

    #[test]
    fn test_plain_image() {
        assert_eq!(convert(r#"<img src="U" alt="T">"#), "![T](U)");
    }

    #[test]
    fn test_plain_image_without_alt() {
        assert_eq!(convert(r#"<img src="U">"#), "![](U)");
    }

    #[test]
    fn test_image_without_src_emits_nothing() {
        assert_eq!(convert("<img>"), "");
        assert_eq!(convert(r#"<img src="">"#), "");
    }

    #[test]
    fn test_figure_caption_beats_alt() {
        let html = r#"<figure><img srcset="s1 100w, s2 200w, s3 300w" alt="Alt"><figcaption>Cap</figcaption></figure>"#;
        assert_eq!(convert(html), "![Cap](s3)");
    }

    #[test]
    fn test_figure_falls_back_to_alt() {
        let html = r#"<figure><img srcset="s1 100w, s2 200w" alt="Alt"></figure>"#;
        assert_eq!(convert(html), "![Alt](s2)");
    }

    #[test]
    fn test_figure_image_without_srcset_emits_nothing() {
        assert_eq!(convert(r#"<figure><img src="U" alt="T"></figure>"#), "");
    }

    #[test]
    fn test_figure_discards_decorative_span() {
        let html =
            r#"<figure><img srcset="s 1w"><span>credit</span><figcaption>Cap</figcaption></figure>"#;
        assert_eq!(convert(html), "![Cap](s)");
    }

    #[test]
    fn test_figure_context_does_not_leak_to_siblings() {
        let html = r#"<figure><img srcset="a 1w" alt="f"></figure><span>credit</span><img src="b" alt="x">"#;
        assert_eq!(convert(html), "![f](a)\ncredit\n![x](b)");
    }

    #[test]
    fn test_unhandled_tags_recurse() {
        assert_eq!(convert("<section><div><p>inner</p></div></section>"), "inner");
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let html = r#"<h1>T</h1><p>a <strong>b</strong></p><ul><li>x</li></ul>"#;
        let document = Html::parse_document(html);

        let mut first = Conversion::new();
        first.convert(body_of(&document));
        let mut second = Conversion::new();
        second.convert(body_of(&document));

        assert_eq!(first.finish(), second.finish());
    }
}
