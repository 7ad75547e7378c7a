//! Accessibility issue records and their static taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingAltText,
    EmptyLink,
    MissingAriaLabel,
    HeadingHierarchy,
    KeyboardInaccessible,
    /// Reserved; no rule emits it yet.
    BrokenLink,
}

impl IssueType {
    /// Every issue type in report order.
    pub const ALL: [IssueType; 6] = [
        IssueType::MissingAltText,
        IssueType::EmptyLink,
        IssueType::MissingAriaLabel,
        IssueType::HeadingHierarchy,
        IssueType::KeyboardInaccessible,
        IssueType::BrokenLink,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MissingAltText => "missing_alt_text",
            IssueType::EmptyLink => "empty_link",
            IssueType::MissingAriaLabel => "missing_aria_label",
            IssueType::HeadingHierarchy => "heading_hierarchy",
            IssueType::KeyboardInaccessible => "keyboard_inaccessible",
            IssueType::BrokenLink => "broken_link",
        }
    }

    /// Label and description shared by every scan.
    pub fn info(&self) -> &'static IssueTypeInfo {
        &ISSUE_TYPE_INFO[*self as usize]
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label/description pair for an [`IssueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueTypeInfo {
    pub label: &'static str,
    pub description: &'static str,
}

/// Indexed by `IssueType as usize`.
static ISSUE_TYPE_INFO: [IssueTypeInfo; 6] = [
    IssueTypeInfo {
        label: "Missing Alt Text",
        description: "Images without alternative text are inaccessible to screen reader users",
    },
    IssueTypeInfo {
        label: "Empty Links",
        description: "Links without text content make navigation difficult for screen readers",
    },
    IssueTypeInfo {
        label: "Missing ARIA Labels",
        description: "Interactive elements without accessible names are hard to identify",
    },
    IssueTypeInfo {
        label: "Heading Hierarchy",
        description: "Incorrect heading order makes page structure confusing for assistive technologies",
    },
    IssueTypeInfo {
        label: "Keyboard Navigation",
        description: "Elements that cannot receive focus block keyboard-only users",
    },
    IssueTypeInfo {
        label: "Broken Links",
        description: "Links that lead nowhere create a poor user experience",
    },
];

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// WCAG success criteria referenced by the rules.
pub mod wcag {
    pub const NON_TEXT_CONTENT: &str = "1.1.1 Non-text Content";
    pub const INFO_AND_RELATIONSHIPS: &str = "1.3.1 Info and Relationships";
    pub const FOCUS_ORDER: &str = "2.4.3 Focus Order";
    pub const LINK_PURPOSE: &str = "2.4.4 Link Purpose";
    pub const NAME_ROLE_VALUE: &str = "4.1.2 Name, Role, Value";
}

/// A single accessibility issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub element: String,
    pub description: String,
    pub wcag_reference: String,
    pub code_snippet: String,
}

impl Issue {
    /// Create an issue with a freshly generated id.
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        element: impl Into<String>,
        description: impl Into<String>,
        wcag_reference: &str,
        code_snippet: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            issue_type,
            severity,
            element: element.into(),
            description: description.into(),
            wcag_reference: wcag_reference.to_string(),
            code_snippet: code_snippet.into(),
        }
    }

    /// Compare every field except `id`.
    pub fn same_finding(&self, other: &Issue) -> bool {
        self.issue_type == other.issue_type
            && self.severity == other.severity
            && self.element == other.element
            && self.description == other.description
            && self.wcag_reference == other.wcag_reference
            && self.code_snippet == other.code_snippet
    }
}
