//! Shared helpers for attribute values and text content.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches highlighter class names like `lang-swift` or `hljs language-rust`
/// and captures the language suffix.
static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"lang.*-(\w+)").expect("language pattern compiles"));

/// Extract the language hint from a `code` element's `class` attribute.
///
/// Best-effort: multiple classes and unexpected prefixes are tolerated, any
/// failure means a fence without a language tag.
pub(crate) fn language_hint(class: &str) -> Option<String> {
    let captures = LANGUAGE_CLASS.captures(class)?;
    Some(captures.get(1)?.as_str().to_owned())
}

/// Extract a usable URL from a `src` or `srcset` attribute value.
///
/// `srcset` entries are comma-separated `url descriptor` pairs; the last
/// entry is by convention the highest-resolution variant, so last wins (no
/// descriptor comparison). A plain `src` has no commas and no descriptor and
/// degrades to the whole value. `%20` sequences are treated as the space
/// between URL and descriptor, which some feeds emit instead of a literal
/// space.
pub(crate) fn extract_url(value: &str) -> Option<String> {
    let candidate = value.split(',').map(str::trim).last()?;
    let candidate = candidate.replace("%20", " ");
    let url = candidate.split(' ').next()?;

    if url.is_empty() {
        None
    } else {
        Some(url.to_owned())
    }
}

/// Collapse runs of whitespace into a single space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}
