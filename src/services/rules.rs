//! Accessibility rules.
//!
//! Each rule is a pure function from element records to issues. Rules do not
//! share state and can run in any order; [`run_all`] concatenates them in the
//! fixed report order.

use crate::models::{ElementRecord, ExtractedElements, Issue, IssueType, Severity, wcag};

/// A named group of checks over extracted elements.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub issue_type: IssueType,
    pub run: fn(&ExtractedElements) -> Vec<Issue>,
}

/// Every check group in report order.
pub const CHECKS: [Check; 5] = [
    Check {
        name: "Missing alt text",
        issue_type: IssueType::MissingAltText,
        run: |e| check_missing_alt_text(&e.images),
    },
    Check {
        name: "Empty links",
        issue_type: IssueType::EmptyLink,
        run: |e| check_empty_links(&e.links),
    },
    Check {
        name: "Accessible names",
        issue_type: IssueType::MissingAriaLabel,
        run: |e| check_accessible_names(&e.buttons, &e.interactive),
    },
    Check {
        name: "Heading hierarchy",
        issue_type: IssueType::HeadingHierarchy,
        run: |e| check_heading_hierarchy(&e.headings),
    },
    Check {
        name: "Keyboard focus order",
        issue_type: IssueType::KeyboardInaccessible,
        run: check_keyboard_order,
    },
];

/// Number of check groups a page is assessed against.
pub const CHECKS_PERFORMED: usize = CHECKS.len();

/// Run every check and concatenate the results in report order.
pub fn run_all(elements: &ExtractedElements) -> Vec<Issue> {
    CHECKS
        .iter()
        .flat_map(|check| {
            let issues = (check.run)(elements);
            log::debug!("{}: {} issue(s)", check.name, issues.len());
            issues
        })
        .collect()
}

/// Images without `alt`, unless marked presentational.
pub fn check_missing_alt_text(images: &[ElementRecord]) -> Vec<Issue> {
    images
        .iter()
        .filter(|img| !matches!(img.attr("role"), Some("presentation" | "none")))
        .filter(|img| img.attr("alt").is_none())
        .map(|img| {
            Issue::new(
                IssueType::MissingAltText,
                Severity::Error,
                "<img>",
                "Image is missing alt attribute. Screen readers cannot describe this image to users.",
                wcag::NON_TEXT_CONTENT,
                &img.source_snippet,
            )
        })
        .collect()
}

/// Links with no text, no name attribute and no image inside.
pub fn check_empty_links(links: &[ElementRecord]) -> Vec<Issue> {
    links
        .iter()
        .filter(|link| link.text_content.is_empty() && !link.has_label_attribute())
        .filter(|link| !link.contains_image)
        .map(|link| {
            Issue::new(
                IssueType::EmptyLink,
                Severity::Error,
                "<a>",
                "Link has no accessible text. Screen readers cannot convey the link's purpose.",
                wcag::LINK_PURPOSE,
                &link.source_snippet,
            )
        })
        .collect()
}

/// Unnamed buttons, icon-only controls and unlabelled form fields.
pub fn check_accessible_names(
    buttons: &[ElementRecord],
    interactive: &[ElementRecord],
) -> Vec<Issue> {
    let mut flagged: Vec<(usize, Issue)> = Vec::new();

    for button in buttons {
        if button.text_content.is_empty()
            && !button.has_label_attribute()
            && !button.has_value("value")
        {
            flagged.push((
                button.offset,
                Issue::new(
                    IssueType::MissingAriaLabel,
                    Severity::Error,
                    button.label(),
                    "Button has no accessible name. Screen readers cannot identify this button's purpose.",
                    wcag::NAME_ROLE_VALUE,
                    &button.source_snippet,
                ),
            ));
        }
    }

    for element in interactive {
        match element.tag.as_str() {
            "icon-button" => flagged.push((
                element.offset,
                Issue::new(
                    IssueType::MissingAriaLabel,
                    Severity::Error,
                    "<icon-button>",
                    "Icon-only button lacks accessible text. Add aria-label or visually hidden text.",
                    wcag::NAME_ROLE_VALUE,
                    &element.source_snippet,
                ),
            )),
            "input" | "select" | "textarea" if !has_form_label(element) => flagged.push((
                element.offset,
                Issue::new(
                    IssueType::MissingAriaLabel,
                    Severity::Warning,
                    element.label(),
                    "Form control has no associated label. Users may not understand its purpose.",
                    wcag::INFO_AND_RELATIONSHIPS,
                    &element.source_snippet,
                ),
            )),
            _ => {}
        }
    }

    in_document_order(flagged)
}

/// An `id` may be targeted by a `<label for>`; a placeholder is a weak label.
fn has_form_label(element: &ElementRecord) -> bool {
    element.has_value("id") || element.has_label_attribute() || element.has_value("placeholder")
}

/// First heading not h1, more than one h1, and skipped levels.
pub fn check_heading_hierarchy(headings: &[ElementRecord]) -> Vec<Issue> {
    let levelled: Vec<(u8, &ElementRecord)> = headings
        .iter()
        .filter_map(|h| h.heading_level().map(|level| (level, h)))
        .collect();

    let Some(&(first_level, first)) = levelled.first() else {
        return Vec::new();
    };

    let mut issues = Vec::new();

    if first_level != 1 {
        issues.push(Issue::new(
            IssueType::HeadingHierarchy,
            Severity::Warning,
            first.label(),
            format!(
                "Page should start with an h1 heading. Found {} instead.",
                first.tag.to_uppercase()
            ),
            wcag::INFO_AND_RELATIONSHIPS,
            &first.source_snippet,
        ));
    }

    let h1_count = levelled.iter().filter(|(level, _)| *level == 1).count();
    if h1_count > 1 {
        issues.push(Issue::new(
            IssueType::HeadingHierarchy,
            Severity::Warning,
            "<h1>",
            format!("Page has {h1_count} h1 headings. Consider using only one main h1 per page."),
            wcag::INFO_AND_RELATIONSHIPS,
            format!("Multiple h1 elements found ({h1_count} total)"),
        ));
    }

    for pair in levelled.windows(2) {
        let (prev_level, _) = pair[0];
        let (level, heading) = pair[1];
        if level > prev_level + 1 {
            issues.push(Issue::new(
                IssueType::HeadingHierarchy,
                Severity::Warning,
                heading.label(),
                format!(
                    "Heading level skips from h{prev_level} to h{level}. This creates confusion for screen reader users."
                ),
                wcag::INFO_AND_RELATIONSHIPS,
                &heading.source_snippet,
            ));
        }
    }

    issues
}

/// Focusable elements with a strictly positive `tabindex`.
///
/// Icon-only records are skipped: the button or anchor they were derived
/// from is already covered.
pub fn check_keyboard_order(elements: &ExtractedElements) -> Vec<Issue> {
    let candidates = elements
        .links
        .iter()
        .chain(&elements.buttons)
        .chain(elements.interactive.iter().filter(|e| e.tag != "icon-button"));

    let flagged = candidates
        .filter_map(|element| {
            let tabindex = positive_tabindex(element)?;
            Some((
                element.offset,
                Issue::new(
                    IssueType::KeyboardInaccessible,
                    Severity::Warning,
                    element.label(),
                    format!(
                        "Element has positive tabindex ({tabindex}). This disrupts natural tab order."
                    ),
                    wcag::FOCUS_ORDER,
                    &element.source_snippet,
                ),
            ))
        })
        .collect();

    in_document_order(flagged)
}

/// `tabindex` parsed as an integer, only when > 0.
fn positive_tabindex(element: &ElementRecord) -> Option<i64> {
    element
        .attr("tabindex")?
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|value| *value > 0)
}

fn in_document_order(mut flagged: Vec<(usize, Issue)>) -> Vec<Issue> {
    flagged.sort_by_key(|(offset, _)| *offset);
    flagged.into_iter().map(|(_, issue)| issue).collect()
}
