use crate::utils::truncate_chars;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Title used when a page has no document title
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Title used when a page could not be rendered at all
pub const PAGE_NOT_LOADED: &str = "Page Not Loaded";

const BLOCK_RULE: &str = "========================================";

/// A navigable link found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Whitespace-normalized link text
    pub display_text: String,

    /// Absolute, fragment-free target
    pub normalized_href: String,

    /// Line shown in the corpus, `- [Link] <text>: <href>`
    pub render_line: String,
}

impl LinkRecord {
    pub fn new(display_text: String, normalized_href: String) -> Self {
        let render_line = format!("- [Link] {}: {}", display_text, normalized_href);
        Self {
            display_text,
            normalized_href,
            render_line,
        }
    }
}

/// Everything extracted from one visited page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub body_text: String,
    pub links: Vec<LinkRecord>,
    /// Button display lines, `- [Button] <label>`
    pub buttons: Vec<String>,
    pub source_url: String,
}

impl PageRecord {
    /// Record for a page that produced no content
    pub fn placeholder(source_url: &str) -> Self {
        Self {
            title: PAGE_NOT_LOADED.to_string(),
            body_text: String::new(),
            links: Vec::new(),
            buttons: Vec::new(),
            source_url: source_url.to_string(),
        }
    }
}

/// Growing text buffer holding one block per processed page
#[derive(Debug, Default)]
pub struct Corpus {
    buffer: String,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the formatted block for a page
    pub fn push_page(&mut self, page: &PageRecord) {
        let links = page
            .links
            .iter()
            .map(|l| l.render_line.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let buttons = page.buttons.join("\n");

        // Writing into a String cannot fail
        let _ = write!(
            self.buffer,
            "{rule}\nPAGE: {title}\nURL: {url}\n{rule}\n\nCONTENT:\n{text}\n\nINTERACTIVE ELEMENTS:\n{links}\n{buttons}\n\n",
            rule = BLOCK_RULE,
            title = page.title,
            url = page.source_url,
            text = page.body_text,
        );
    }

    /// Length of the buffer in characters
    pub fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Consume the buffer, keeping at most `max_chars` characters.
    ///
    /// The cut ignores block boundaries.
    pub fn finish(self, max_chars: usize) -> String {
        let mut text = self.buffer;
        truncate_chars(&mut text, max_chars);
        text
    }
}
