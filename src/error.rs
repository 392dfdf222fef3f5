use thiserror::Error;

/// Errors that abort a whole crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    /// No seed URL was given
    #[error("URL is required")]
    MissingUrl,

    /// The seed URL could not be parsed
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The seed URL parsed but carries no hostname to scope the crawl to
    #[error("URL has no host: {url}")]
    MissingHost { url: String },

    /// The browsing session could not be opened or released
    #[error("browser session error: {0}")]
    Session(#[from] DriverError),
}

impl CrawlError {
    /// Input errors are the caller's fault and never reach the browser
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CrawlError::MissingUrl | CrawlError::InvalidUrl { .. } | CrawlError::MissingHost { .. }
        )
    }
}

/// Errors raised by a page driver
#[derive(Debug, Error)]
pub enum DriverError {
    /// No WebDriver endpoint accepted a new session
    #[error("failed to connect to WebDriver: {0}")]
    Connect(String),

    /// Navigation to a page failed
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Navigation did not finish within the page timeout
    #[error("navigation to {url} timed out")]
    Timeout { url: String },

    /// A script evaluated inside the page failed
    #[error("page script failed: {0}")]
    Script(String),

    /// A script result did not have the expected shape
    #[error("unexpected page script result: {0}")]
    Decode(#[from] serde_json::Error),

    /// The session was used after it was closed
    #[error("browser session already closed")]
    Closed,

    /// The session could not be shut down cleanly
    #[error("failed to close browser session: {0}")]
    Close(String),
}
