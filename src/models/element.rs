//! Element records produced by markup extraction.

use std::collections::HashMap;

/// Maximum number of characters kept in a source snippet.
pub const SNIPPET_MAX_CHARS: usize = 150;

/// Marker appended to snippets that were cut short.
pub const SNIPPET_ELLIPSIS: &str = "...";

/// A single element matched in raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRecord {
    /// Lower-cased tag label (`img`, `a`, `h2`, `icon-button`, ...)
    pub tag: String,

    /// Lower-cased attribute names mapped to raw values
    pub attributes: HashMap<String, String>,

    /// Visible text with nested tags stripped
    pub text_content: String,

    /// Matched markup, truncated to [`SNIPPET_MAX_CHARS`]
    pub source_snippet: String,

    /// Byte offset of the match in the scanned markup
    pub offset: usize,

    /// Whether the full matched markup holds an `<img`
    pub contains_image: bool,
}

impl ElementRecord {
    /// Build a record, truncating the matched markup into a snippet.
    pub fn new(
        tag: impl Into<String>,
        attributes: HashMap<String, String>,
        text_content: impl Into<String>,
        matched: &str,
        offset: usize,
    ) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            text_content: text_content.into(),
            source_snippet: truncate_snippet(matched),
            offset,
            contains_image: matched.to_ascii_lowercase().contains("<img"),
        }
    }

    /// Raw attribute value, if the attribute is present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// True when the attribute is present with a non-empty value.
    pub fn has_value(&self, name: &str) -> bool {
        self.attr(name).is_some_and(|v| !v.is_empty())
    }

    /// True when the element carries an explicit accessible-name attribute.
    pub fn has_label_attribute(&self) -> bool {
        self.has_value("aria-label") || self.has_value("aria-labelledby") || self.has_value("title")
    }

    /// Heading level for `h1`..`h6`, `None` for every other tag.
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag.as_bytes() {
            [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
            _ => None,
        }
    }

    /// Tag label as shown in reports, e.g. `<img>`.
    pub fn label(&self) -> String {
        format!("<{}>", self.tag)
    }
}

/// The five element categories the rules consume, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedElements {
    pub images: Vec<ElementRecord>,
    pub links: Vec<ElementRecord>,
    pub buttons: Vec<ElementRecord>,
    pub headings: Vec<ElementRecord>,
    pub interactive: Vec<ElementRecord>,
}

impl ExtractedElements {
    /// Total number of extracted records across categories.
    pub fn len(&self) -> usize {
        self.images.len()
            + self.links.len()
            + self.buttons.len()
            + self.headings.len()
            + self.interactive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Truncate matched markup to the snippet limit, counting characters.
pub fn truncate_snippet(markup: &str) -> String {
    match markup.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &markup[..cut], SNIPPET_ELLIPSIS),
        None => markup.to_string(),
    }
}
