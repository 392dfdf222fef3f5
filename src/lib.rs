//! Same-origin site crawler that turns a website into one bounded text corpus.
//!
//! Starting from a seed URL the crawler renders pages one at a time in a
//! browser, records their visible text, links and buttons, follows links on
//! the seed's hostname (pages about the company, its services, careers, and
//! so on first) and returns the concatenated page blocks.

pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod frontier;
pub mod parsers;
pub mod results;
pub mod server;
pub mod utils;

pub use config::{CrawlLimits, CrawlerConfig};
pub use crawlers::{CrawlOutcome, PageDriver, SiteCrawler};
pub use error::{CrawlError, DriverError};
pub use results::{LinkRecord, PageRecord};

/// Builder for a single site crawl
pub struct SiteCorpus {
    url: String,
    config: CrawlerConfig,
}

impl SiteCorpus {
    /// Create a crawl of the site behind `url` with default settings and
    /// the `WEBDRIVER_URL` environment override applied
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: CrawlerConfig::default().with_env_overrides(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file, keeping the `WEBDRIVER_URL`
    /// override on top of it
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CrawlerConfig::from_file(path)?.with_env_overrides();
        Ok(self.with_config(config))
    }

    /// Set the maximum number of pages to fetch
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.limits.max_pages = max_pages;
        self
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self
    }

    /// Run the crawl in a fresh browser session
    pub async fn crawl(self) -> Result<CrawlOutcome, CrawlError> {
        let crawler = SiteCrawler::new(self.config);
        crawler.crawl(&self.url).await
    }

    /// Run the crawl through a caller-provided page driver
    pub async fn crawl_with<D: PageDriver>(self, driver: D) -> Result<CrawlOutcome, CrawlError> {
        let crawler = SiteCrawler::new(self.config);
        crawler.crawl_with(&self.url, driver).await
    }
}
