//! Markup extraction.
//!
//! Pulls the element classes the rules need out of raw HTML with one
//! independent pattern scan per class. There is no DOM: a malformed region
//! only costs the matches it overlaps, never the rest of the document.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{ElementRecord, ExtractedElements};
use crate::services::attributes::parse_attributes;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("valid ", stringify!($name), " pattern")));
    };
}

// Markup that is never rendered as content.
pattern!(INERT, r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>");

pattern!(IMG, r"(?i)<img\b([^>]*)>");
pattern!(ANCHOR, r"(?is)<a\b([^>]*)>(.*?)</a\s*>");
pattern!(BUTTON, r"(?is)<button\b([^>]*)>(.*?)</button\s*>");
pattern!(INPUT, r"(?i)<input\b([^>]*)>");
pattern!(SELECT, r"(?is)<select\b([^>]*)>.*?</select\s*>");
pattern!(TEXTAREA, r"(?is)<textarea\b([^>]*)>.*?</textarea\s*>");
pattern!(H1, r"(?is)<h1\b([^>]*)>(.*?)</h1\s*>");
pattern!(H2, r"(?is)<h2\b([^>]*)>(.*?)</h2\s*>");
pattern!(H3, r"(?is)<h3\b([^>]*)>(.*?)</h3\s*>");
pattern!(H4, r"(?is)<h4\b([^>]*)>(.*?)</h4\s*>");
pattern!(H5, r"(?is)<h5\b([^>]*)>(.*?)</h5\s*>");
pattern!(H6, r"(?is)<h6\b([^>]*)>(.*?)</h6\s*>");
pattern!(LEADING_TAG, r"(?i)^<([a-z][a-z0-9-]*)\b([^>]*)>");
pattern!(TAG, r"<[^>]*>");
pattern!(WHITESPACE, r"\s+");

/// `<input type>` values rendered as buttons.
const BUTTON_INPUT_TYPES: &[&str] = &["button", "submit", "reset"];

/// `<input type>` values that are neither text-like controls nor visible.
const NON_FIELD_INPUT_TYPES: &[&str] = &["hidden", "button", "submit", "reset"];

/// Child tags that render as icons on their own.
const ICON_TAGS: &[&str] = &["svg", "i"];

/// Extract every element category from a document.
pub fn extract(html: &str) -> ExtractedElements {
    let html = strip_inert(html);
    let html = html.as_str();

    ExtractedElements {
        images: extract_images(html),
        links: extract_links(html),
        buttons: extract_buttons(html),
        headings: extract_headings(html),
        interactive: extract_interactive(html),
    }
}

/// Drop comments, scripts and styles so markup inside them is not matched.
fn strip_inert(html: &str) -> String {
    INERT.replace_all(html, " ").into_owned()
}

/// `<img>` elements in both `<img ...>` and `<img .../>` forms.
pub fn extract_images(html: &str) -> Vec<ElementRecord> {
    IMG.captures_iter(html)
        .map(|caps| record("img", &caps, attributes(&caps), ""))
        .collect()
}

/// `<a>` elements with their visible text.
pub fn extract_links(html: &str) -> Vec<ElementRecord> {
    ANCHOR
        .captures_iter(html)
        .map(|caps| record("a", &caps, attributes(&caps), inner_text(&caps)))
        .collect()
}

/// `<button>` elements plus button-typed `<input>`s, in document order.
pub fn extract_buttons(html: &str) -> Vec<ElementRecord> {
    let buttons = BUTTON
        .captures_iter(html)
        .map(|caps| record("button", &caps, attributes(&caps), inner_text(&caps)));

    let inputs = INPUT.captures_iter(html).filter_map(|caps| {
        let attrs = attributes(&caps);
        if !BUTTON_INPUT_TYPES.contains(&input_type(&attrs).as_str()) {
            return None;
        }
        let text = attrs.get("value").cloned().unwrap_or_default();
        Some(record("input", &caps, attrs, text))
    });

    in_document_order(buttons.chain(inputs))
}

/// `<h1>`..`<h6>` elements with whitespace-normalized text.
pub fn extract_headings(html: &str) -> Vec<ElementRecord> {
    let levels: [(&str, &LazyLock<Regex>); 6] = [
        ("h1", &H1),
        ("h2", &H2),
        ("h3", &H3),
        ("h4", &H4),
        ("h5", &H5),
        ("h6", &H6),
    ];

    let matches = levels.into_iter().flat_map(|(tag, re)| {
        re.captures_iter(html)
            .map(move |caps| record(tag, &caps, attributes(&caps), inner_text(&caps)))
    });

    in_document_order(matches)
}

/// Form fields, `<select>`, `<textarea>` and synthetic `icon-button` records.
pub fn extract_interactive(html: &str) -> Vec<ElementRecord> {
    let inputs = INPUT.captures_iter(html).filter_map(|caps| {
        let attrs = attributes(&caps);
        if NON_FIELD_INPUT_TYPES.contains(&input_type(&attrs).as_str()) {
            return None;
        }
        Some(record("input", &caps, attrs, ""))
    });

    let selects = SELECT
        .captures_iter(html)
        .map(|caps| record("select", &caps, attributes(&caps), ""));

    let textareas = TEXTAREA
        .captures_iter(html)
        .map(|caps| record("textarea", &caps, attributes(&caps), ""));

    let icons = BUTTON
        .captures_iter(html)
        .chain(ANCHOR.captures_iter(html))
        .filter_map(|caps| icon_only_control(&caps));

    in_document_order(inputs.chain(selects).chain(textareas).chain(icons))
}

/// A button or anchor whose only content is an icon and which has no name.
///
/// Content holding an `<img>` is left to the image and link rules.
fn icon_only_control(caps: &Captures<'_>) -> Option<ElementRecord> {
    let inner = caps.get(2).map_or("", |m| m.as_str()).trim();
    let lower = inner.to_ascii_lowercase();
    if lower.contains("<img") || !strip_tags(inner).is_empty() {
        return None;
    }

    let child = LEADING_TAG.captures(inner)?;
    let child_tag = child.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
    let child_attrs = parse_attributes(child.get(2).map_or("", |m| m.as_str()));
    let is_icon = ICON_TAGS.contains(&child_tag.as_str())
        || child_attrs
            .get("class")
            .is_some_and(|class| class.to_lowercase().contains("icon"));
    if !is_icon {
        return None;
    }

    // Nothing but whitespace may follow the icon element.
    let open_end = child.get(0).map_or(0, |m| m.end());
    let close = format!("</{child_tag}>");
    let rest = match lower.rfind(&close) {
        Some(at) if at >= open_end => &lower[at + close.len()..],
        _ => &lower[open_end..],
    };
    if !rest.trim().is_empty() {
        return None;
    }

    let control = record("icon-button", caps, attributes(caps), "");
    (!control.has_label_attribute()).then_some(control)
}

fn record(
    tag: &str,
    caps: &Captures<'_>,
    attributes: HashMap<String, String>,
    text: impl Into<String>,
) -> ElementRecord {
    let (matched, offset) = caps
        .get(0)
        .map_or(("", 0), |m| (m.as_str(), m.start()));
    ElementRecord::new(tag, attributes, text, matched, offset)
}

fn attributes(caps: &Captures<'_>) -> HashMap<String, String> {
    parse_attributes(caps.get(1).map_or("", |m| m.as_str()))
}

fn inner_text(caps: &Captures<'_>) -> String {
    strip_tags(caps.get(2).map_or("", |m| m.as_str()))
}

/// Lower-cased `type` attribute, `text` when absent.
fn input_type(attrs: &HashMap<String, String>) -> String {
    attrs
        .get("type")
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Replace tags with spaces, collapse whitespace and trim.
pub fn strip_tags(markup: &str) -> String {
    let text = TAG.replace_all(markup, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn in_document_order(records: impl Iterator<Item = ElementRecord>) -> Vec<ElementRecord> {
    let mut records: Vec<_> = records.collect();
    records.sort_by_key(|r| r.offset);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_both_forms() {
        let html = r#"<img src="a.png"><IMG src="b.png" alt="B"/><img>"#;
        let images = extract_images(html);
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].attr("src"), Some("a.png"));
        assert_eq!(images[1].attr("alt"), Some("B"));
        assert!(images[2].attributes.is_empty());
    }

    #[test]
    fn test_links_text_and_boundaries() {
        let html = r#"<abbr title="x">X</abbr><a href="/a"> Home
            <span>page</span> </a><article></article><a href="/b"></a>"#;
        let links = extract_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text_content, "Home page");
        assert_eq!(links[1].text_content, "");
        assert_eq!(links[1].source_snippet, r#"<a href="/b"></a>"#);
    }

    #[test]
    fn test_buttons_include_button_inputs_in_order() {
        let html = r#"<input type="submit" value="Send"><button>Go</button><input type="text">"#;
        let buttons = extract_buttons(html);
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].tag, "input");
        assert_eq!(buttons[0].text_content, "Send");
        assert_eq!(buttons[1].tag, "button");
        assert_eq!(buttons[1].text_content, "Go");
    }

    #[test]
    fn test_headings_document_order_and_text() {
        let html = "<h2>Second</h2><H1 class=\"t\">  Main\n\t<em>title</em> </H1><h3>x</h2>";
        let headings = extract_headings(html);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].tag, "h2");
        assert_eq!(headings[1].tag, "h1");
        assert_eq!(headings[1].text_content, "Main title");
        assert_eq!(headings[1].heading_level(), Some(1));
    }

    #[test]
    fn test_interactive_excludes_non_fields() {
        let html = r#"
            <input type="hidden" name="csrf">
            <input type="SUBMIT">
            <input name="q">
            <select id="s"><option>1</option></select>
            <textarea></textarea>
            <input type="email" />
        "#;
        let interactive = extract_interactive(html);
        let tags: Vec<&str> = interactive.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["input", "select", "textarea", "input"]);
    }

    #[test]
    fn test_icon_only_controls() {
        let html = r#"
            <button class="close"><svg viewBox="0 0 1 1"><path d="M0"/></svg></button>
            <a href="/cart"><span class="icon icon-cart"></span></a>
            <button aria-label="Menu"><i class="fa fa-bars"></i></button>
            <button><i class="fa fa-save"></i> Save</button>
            <a href="/x"><span class="label"></span></a>
        "#;
        let icons: Vec<_> = extract_interactive(html)
            .into_iter()
            .filter(|e| e.tag == "icon-button")
            .collect();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].attr("class"), Some("close"));
        assert_eq!(icons[1].attr("href"), Some("/cart"));
    }

    #[test]
    fn test_icon_followed_by_other_content_is_not_icon_only() {
        let html = r#"
            <a href="/"><svg></svg><img src="logo.png" alt="Logo"></a>
            <a href="/"><img class="logo-icon" src="home.png" alt="Home"></a>
            <button><span class="icon"></span><span class="badge"></span></button>
            <button><i class="fa fa-x"></i><b></b></button>
        "#;
        let icons = extract_interactive(html)
            .into_iter()
            .filter(|e| e.tag == "icon-button")
            .count();
        assert_eq!(icons, 0);
    }

    #[test]
    fn test_icon_with_trailing_whitespace_is_icon_only() {
        let html = "<button>\n  <i class=\"fa fa-x\"></i>\n</button>";
        let icons: Vec<_> = extract_interactive(html)
            .into_iter()
            .filter(|e| e.tag == "icon-button")
            .collect();
        assert_eq!(icons.len(), 1);
    }

    #[test]
    fn test_link_image_flag_uses_full_markup() {
        let html = format!(
            r#"<a href="/p?{}"><img src="logo.png" alt="Logo"></a><a href="/q">Q</a>"#,
            "x".repeat(160)
        );
        let links = extract_links(&html);
        assert!(links[0].contains_image);
        assert!(!links[0].source_snippet.contains("<img"));
        assert!(!links[1].contains_image);
    }

    #[test]
    fn test_inert_markup_is_ignored() {
        let html = r#"<!-- <img src="old.png"> --><script>var s = '<a href="/x"></a>';</script><img src="new.png">"#;
        let elements = extract(html);
        assert_eq!(elements.images.len(), 1);
        assert_eq!(elements.images[0].attr("src"), Some("new.png"));
        assert!(elements.links.is_empty());
    }

    #[test]
    fn test_unclosed_markup_does_not_abort_other_classes() {
        let html = r#"<a href="/never-closed"><h1>Title</h1><img src="x.png"><button>"#;
        let elements = extract(html);
        assert!(elements.links.is_empty());
        assert!(elements.buttons.is_empty());
        assert_eq!(elements.headings.len(), 1);
        assert_eq!(elements.images.len(), 1);
    }

    #[test]
    fn test_snippets_are_bounded() {
        let html = format!(r#"<a href="/long">{}</a>"#, "word ".repeat(100));
        let links = extract_links(&html);
        assert!(links[0].source_snippet.chars().count() <= 153);
        assert!(links[0].source_snippet.ends_with("..."));
    }
}
