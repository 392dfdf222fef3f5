use crate::crawlers::driver::PageDriver;
use crate::error::DriverError;
use crate::parsers::{RawPage, html};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// How a URL behaves in a [`StaticSiteDriver`]
#[derive(Debug, Clone)]
pub enum StaticPage {
    /// Serve this HTML
    Html(String),
    /// Fail the navigation with this reason
    Unreachable(String),
    /// Never finish navigating
    Hang,
}

/// Record of what a [`StaticSiteDriver`] was asked to do, shared with its creator
#[derive(Debug, Clone, Default)]
pub struct DriverHistory {
    navigations: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl DriverHistory {
    /// URLs navigated to, in order
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record_navigation(&self, url: &str) {
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(url.to_string());
        }
    }
}

/// Page driver over an in-memory set of HTML documents.
///
/// Snapshots are computed with an HTML parser instead of a browser, so no
/// script runs. Unknown URLs fail to navigate like an unreachable host.
#[derive(Debug, Default)]
pub struct StaticSiteDriver {
    pages: HashMap<String, StaticPage>,
    current: Option<String>,
    fail_menu_reveal: bool,
    fail_close: bool,
    history: DriverHistory,
}

impl StaticSiteDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), StaticPage::Html(html.to_string()));
        self
    }

    /// Make `url` behave as given
    pub fn with_behavior(mut self, url: &str, page: StaticPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Make every menu reveal attempt fail
    pub fn with_failing_menu_reveal(mut self) -> Self {
        self.fail_menu_reveal = true;
        self
    }

    /// Make releasing the driver fail after marking it closed
    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Handle for inspecting the driver after it has been handed to a crawler
    pub fn history(&self) -> DriverHistory {
        self.history.clone()
    }
}

#[async_trait]
impl PageDriver for StaticSiteDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        if self.history.is_closed() {
            return Err(DriverError::Closed);
        }
        self.history.record_navigation(url);
        self.current = None;

        match self.pages.get(url) {
            Some(StaticPage::Html(_)) => {
                self.current = Some(url.to_string());
                Ok(())
            }
            Some(StaticPage::Unreachable(reason)) => Err(DriverError::Navigation {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            Some(StaticPage::Hang) => {
                std::future::pending::<()>().await;
                Ok(())
            }
            None => Err(DriverError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            }),
        }
    }

    async fn reveal_menus(&mut self, _selectors: &[&str]) -> Result<(), DriverError> {
        if self.fail_menu_reveal {
            return Err(DriverError::Script(
                "menu reveal disabled for this site".to_string(),
            ));
        }
        Ok(())
    }

    async fn snapshot(
        &mut self,
        link_selectors: &[&str],
        button_selector: &str,
    ) -> Result<RawPage, DriverError> {
        let current = self.current.as_deref().ok_or_else(|| {
            DriverError::Script("no document loaded".to_string())
        })?;
        match self.pages.get(current) {
            Some(StaticPage::Html(source)) => {
                Ok(html::snapshot(source, link_selectors, button_selector))
            }
            _ => Err(DriverError::Script(format!("no document at {}", current))),
        }
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.history.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(DriverError::Close("session already gone".to_string()));
        }
        Ok(())
    }
}
