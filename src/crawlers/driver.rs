use crate::error::DriverError;
use crate::parsers::RawPage;
use async_trait::async_trait;

/// A browsing session the crawler drives one page at a time.
///
/// Implementations own a single tab that is reused across navigations. All
/// DOM access goes through [`PageDriver::snapshot`] and
/// [`PageDriver::reveal_menus`], which take selectors and return plain data.
#[async_trait]
pub trait PageDriver: Send {
    /// Load a URL, returning once the initial DOM has been parsed
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Dispatch hover/enter events on the matched elements so that
    /// hover-revealed submenus get rendered
    async fn reveal_menus(&mut self, selectors: &[&str]) -> Result<(), DriverError>;

    /// Read title, rendered body text, anchors and button labels of the current page
    async fn snapshot(
        &mut self,
        link_selectors: &[&str],
        button_selector: &str,
    ) -> Result<RawPage, DriverError>;

    /// Release the session and any browser process behind it
    async fn close(&mut self) -> Result<(), DriverError>;
}
