use crate::parsers::{RawAnchor, RawPage};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Elements whose text a browser never renders
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Reads the same DOM state a browser snapshot reports, from static HTML.
///
/// Text is the concatenated text nodes with whitespace collapsed, which is
/// close to, but not the same as, a browser's layout-aware rendered text.
/// Script, style, noscript and template contents are left out.
pub fn snapshot(html: &str, link_selectors: &[&str], button_selector: &str) -> RawPage {
    let doc = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_selector)
        .next()
        .map(|t| element_text(&t))
        .filter(|t| !t.is_empty());

    let body_selector = Selector::parse("body").unwrap();
    let Some(body) = doc.select(&body_selector).next() else {
        return RawPage {
            title,
            ..RawPage::default()
        };
    };

    let mut seen = HashSet::new();
    let mut anchors = Vec::new();
    for raw_selector in link_selectors {
        let selector = match Selector::parse(raw_selector) {
            Ok(selector) => selector,
            Err(e) => {
                ::log::warn!("Skipping invalid link selector {:?}: {}", raw_selector, e);
                continue;
            }
        };
        for element in doc.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if seen.insert(element.id()) {
                anchors.push(RawAnchor {
                    text: element_text(&element),
                    href: href.to_string(),
                });
            }
        }
    }

    let buttons = match Selector::parse(button_selector) {
        Ok(selector) => doc.select(&selector).map(|b| element_text(&b)).collect(),
        Err(e) => {
            ::log::warn!("Skipping invalid button selector {:?}: {}", button_selector, e);
            Vec::new()
        }
    };

    ::log::debug!("HTML snapshot found {} anchors", anchors.len());

    RawPage {
        title,
        body_text: Some(element_text(&body)),
        anchors,
        buttons,
    }
}

fn element_text(element: &ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{BUTTON_SELECTOR, LINK_SELECTORS};

    #[test]
    fn test_snapshot_reads_title_body_and_buttons() {
        let html = "<html><head><title>Acme</title></head><body><h1>Hello</h1><p>world</p>\
                    <button> Buy  now </button></body></html>";
        let raw = snapshot(html, &LINK_SELECTORS, BUTTON_SELECTOR);
        assert_eq!(raw.title.as_deref(), Some("Acme"));
        assert_eq!(raw.body_text.as_deref(), Some("Hello world Buy now"));
        assert_eq!(raw.buttons, vec!["Buy now"]);
    }

    #[test]
    fn test_elements_matched_by_several_selectors_are_reported_once() {
        let html = r#"<html><body>
            <nav><ul><li><a href="/about">About</a></li></ul></nav>
            <footer><a href="/about">About us</a></footer>
            <a>no href</a>
        </body></html>"#;
        let raw = snapshot(html, &LINK_SELECTORS, BUTTON_SELECTOR);
        assert_eq!(
            raw.anchors,
            vec![
                RawAnchor {
                    text: "About".to_string(),
                    href: "/about".to_string()
                },
                RawAnchor {
                    text: "About us".to_string(),
                    href: "/about".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_title() {
        let raw = snapshot("<p>text</p>", &LINK_SELECTORS, BUTTON_SELECTOR);
        assert_eq!(raw.title, None);
        assert_eq!(raw.body_text.as_deref(), Some("text"));
    }

    #[test]
    fn test_script_and_style_text_is_not_rendered() {
        let html = r#"<html><head><title>Acme</title><style>h1 { color: red; }</style></head>
            <body><script>window.tracking = true;</script><h1>Hello</h1>
            <noscript>Enable JavaScript</noscript><p>world <style>p{}</style>again</p>
            <button><script>1</script>Go</button></body></html>"#;
        let raw = snapshot(html, &LINK_SELECTORS, BUTTON_SELECTOR);
        assert_eq!(raw.title.as_deref(), Some("Acme"));
        assert_eq!(raw.body_text.as_deref(), Some("Hello world again Go"));
        assert_eq!(raw.buttons, vec!["Go"]);
    }
}
