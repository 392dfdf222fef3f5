//! Turning a rendered page into a [`PageRecord`].
//!
//! A page driver reports what the document contains as a [`RawPage`]; this
//! module applies the cleanup rules (whitespace, href resolution, dropping
//! unusable links and empty labels) that make it a record.

pub mod html;

use crate::filter::UrlFilter;
use crate::results::{LinkRecord, PageRecord, UNTITLED_PAGE};
use crate::utils::collapse_whitespace;
use serde::{Deserialize, Serialize};

/// Anchor selectors, biased toward navigation regions. An element matched by
/// several selectors is reported once.
pub const LINK_SELECTORS: [&str; 10] = [
    "a[href]",
    "nav a",
    "header a",
    "footer a",
    "[role=\"navigation\"] a",
    ".menu a",
    ".nav a",
    ".navbar a",
    ".dropdown a",
    "ul li a",
];

/// Selector for interactive buttons
pub const BUTTON_SELECTOR: &str = "button";

/// Elements that receive hover events to expose dropdown menus
pub const MENU_SELECTORS: [&str; 5] = ["nav a", "nav button", ".menu a", ".navbar a", "header a"];

/// An anchor as seen in the document, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnchor {
    /// Rendered text of the anchor
    #[serde(default)]
    pub text: String,

    /// Value of the `href` attribute, verbatim
    #[serde(default)]
    pub href: String,
}

/// DOM state read from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Document title, if any
    #[serde(default)]
    pub title: Option<String>,

    /// Rendered body text; `None` when the document has no body
    #[serde(default)]
    pub body_text: Option<String>,

    /// Anchors in selector order, one entry per element
    #[serde(default)]
    pub anchors: Vec<RawAnchor>,

    /// Rendered button labels
    #[serde(default)]
    pub buttons: Vec<String>,
}

/// Build the record for a page from its raw DOM state
pub fn extract_page(raw: RawPage, source_url: &str, filter: &UrlFilter) -> PageRecord {
    let Some(body_text) = raw.body_text else {
        ::log::debug!("No document body on {}, using placeholder", source_url);
        return PageRecord::placeholder(source_url);
    };

    let title = raw
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_PAGE.to_string());

    let links = raw
        .anchors
        .iter()
        .filter_map(|anchor| extract_link(anchor, filter))
        .collect();

    let buttons = raw
        .buttons
        .iter()
        .map(|label| collapse_whitespace(label))
        .filter(|label| !label.is_empty())
        .map(|label| format!("- [Button] {}", label))
        .collect();

    PageRecord {
        title,
        body_text,
        links,
        buttons,
        source_url: source_url.to_string(),
    }
}

/// Normalize one anchor, dropping it when it has no text or no usable target
pub fn extract_link(anchor: &RawAnchor, filter: &UrlFilter) -> Option<LinkRecord> {
    let text = collapse_whitespace(&anchor.text);
    let href = filter.resolve(&anchor.href)?;
    if text.is_empty() {
        return None;
    }
    Some(LinkRecord::new(text, href.to_string()))
}
