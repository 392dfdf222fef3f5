use crate::config::CrawlerConfig;
use crate::crawlers::driver::PageDriver;
use crate::crawlers::web::WebDriverSession;
use crate::error::{CrawlError, DriverError};
use crate::filter::UrlFilter;
use crate::frontier::Frontier;
use crate::parsers::{self, BUTTON_SELECTOR, LINK_SELECTORS, MENU_SELECTORS};
use crate::results::{Corpus, PageRecord};
use std::collections::HashSet;
use tokio::time::{sleep, timeout};
use url::Url;

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Aggregated page blocks, truncated to the output limit
    pub text: String,
    /// Every fetched URL, in fetch order
    pub visited: Vec<String>,
    /// Pages whose navigation or extraction failed
    pub pages_failed: usize,
    /// URLs still pending when the crawl stopped
    pub frontier_remaining: usize,
    /// Character length of the aggregated text before truncation
    pub untruncated_len: usize,
}

impl CrawlOutcome {
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }
}

/// State of one crawl invocation. Created from the seed, owned by the
/// crawl loop, dropped when the crawl returns.
#[derive(Debug)]
pub struct CrawlSession {
    filter: UrlFilter,
    visited: HashSet<String>,
    visit_order: Vec<String>,
    frontier: Frontier,
    page_count: usize,
    max_pages: usize,
    pages_failed: usize,
    corpus: Corpus,
}

impl CrawlSession {
    /// Validate the seed URL and set up an empty session around it
    pub fn new(seed: &str, config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(CrawlError::MissingUrl);
        }
        let seed_url = Url::parse(seed).map_err(|source| CrawlError::InvalidUrl {
            url: seed.to_string(),
            source,
        })?;
        let filter = UrlFilter::from_seed(&seed_url)?;

        let mut frontier = Frontier::new(&config.priority_keywords);
        frontier.push(UrlFilter::normalize_url(&seed_url).to_string());

        Ok(Self {
            filter,
            visited: HashSet::new(),
            visit_order: Vec::new(),
            frontier,
            page_count: 0,
            max_pages: config.limits.max_pages,
            pages_failed: 0,
            corpus: Corpus::new(),
        })
    }

    pub fn base_domain(&self) -> &str {
        self.filter.base_domain()
    }

    pub fn base_url(&self) -> &str {
        self.filter.base_url()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Pop the next unvisited URL and mark it visited.
    ///
    /// Returns `None` once the page cap is reached or the frontier is empty.
    pub fn next_url(&mut self) -> Option<String> {
        while self.page_count < self.max_pages {
            let url = self.frontier.pop()?;
            if self.visited.contains(&url) {
                continue;
            }
            self.visited.insert(url.clone());
            self.visit_order.push(url.clone());
            self.page_count += 1;
            return Some(url);
        }
        None
    }

    /// Append a page to the corpus and queue its unvisited same-domain links
    pub fn record_page(&mut self, page: &PageRecord) {
        self.corpus.push_page(page);

        let mut queued = HashSet::new();
        for link in &page.links {
            let Ok(target) = Url::parse(&link.normalized_href) else {
                continue;
            };
            if !self.filter.is_same_domain(&target) {
                ::log::trace!("Ignoring external link: {}", link.normalized_href);
                continue;
            }
            if self.visited.contains(&link.normalized_href) {
                continue;
            }
            if queued.insert(link.normalized_href.as_str()) {
                ::log::debug!("Queuing link for crawling: {}", link.normalized_href);
                self.frontier.push(link.normalized_href.clone());
            }
        }
    }

    /// Record a page that produced no content
    pub fn record_failure(&mut self, url: &str) {
        self.pages_failed += 1;
        self.corpus.push_page(&PageRecord::placeholder(url));
    }

    /// Truncate the corpus and summarize the crawl
    pub fn finish(self, max_output_chars: usize) -> CrawlOutcome {
        let untruncated_len = self.corpus.char_len();
        ::log::info!(
            "Crawled {} pages from {} ({} failed)",
            self.page_count,
            self.filter.base_domain(),
            self.pages_failed
        );
        ::log::info!("Total content length: {} characters", untruncated_len);

        CrawlOutcome {
            text: self.corpus.finish(max_output_chars),
            visited: self.visit_order,
            pages_failed: self.pages_failed,
            frontier_remaining: self.frontier.len(),
            untruncated_len,
        }
    }
}

/// Crawls one site, one page at a time, through a single browsing session
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    config: CrawlerConfig,
}

impl SiteCrawler {
    pub fn new(config: CrawlerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl a site with a fresh WebDriver session.
    ///
    /// The seed is validated before any browser is started.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome, CrawlError> {
        let session = CrawlSession::new(seed, &self.config)?;
        ::log::info!("Starting full website crawl from: {}", seed);
        let driver = WebDriverSession::connect(&self.config).await?;
        self.run(session, driver).await
    }

    /// Crawl a site through the given driver
    pub async fn crawl_with<D: PageDriver>(
        &self,
        seed: &str,
        driver: D,
    ) -> Result<CrawlOutcome, CrawlError> {
        let session = CrawlSession::new(seed, &self.config)?;
        self.run(session, driver).await
    }

    /// Run the crawl loop, then release the driver whatever the loop did
    async fn run<D: PageDriver>(
        &self,
        mut session: CrawlSession,
        mut driver: D,
    ) -> Result<CrawlOutcome, CrawlError> {
        self.crawl_loop(&mut session, &mut driver).await;

        if let Err(e) = driver.close().await {
            ::log::error!("Failed to release browser session: {}", e);
            return Err(CrawlError::Session(e));
        }

        Ok(session.finish(self.config.limits.max_output_chars))
    }

    async fn crawl_loop<D: PageDriver>(&self, session: &mut CrawlSession, driver: &mut D) {
        let max_pages = self.config.limits.max_pages;
        while let Some(url) = session.next_url() {
            ::log::info!(
                "Crawling page {}/{}: {}",
                session.page_count(),
                max_pages,
                url
            );

            match self.visit(driver, session, &url).await {
                Ok(page) => {
                    ::log::info!("Found {} links on {}", page.links.len(), url);
                    if !page.links.is_empty() && page.links.len() <= 10 {
                        let texts: Vec<&str> =
                            page.links.iter().map(|l| l.display_text.as_str()).collect();
                        ::log::debug!("Links: {}", texts.join(", "));
                    }
                    session.record_page(&page);
                }
                Err(e) => {
                    ::log::warn!("Failed to crawl {}: {}", url, e);
                    session.record_failure(&url);
                }
            }
        }
    }

    /// Load, settle and extract a single page
    async fn visit<D: PageDriver>(
        &self,
        driver: &mut D,
        session: &CrawlSession,
        url: &str,
    ) -> Result<PageRecord, DriverError> {
        let limits = &self.config.limits;
        match timeout(limits.navigation_timeout(), driver.navigate(url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DriverError::Timeout {
                    url: url.to_string(),
                });
            }
        }

        sleep(limits.settle_delay()).await;
        self.reveal_menus(driver, url).await;

        let raw = driver.snapshot(&LINK_SELECTORS, BUTTON_SELECTOR).await?;
        Ok(parsers::extract_page(raw, url, &session.filter))
    }

    /// Best-effort, non-fatal: hover the navigation menus so dropdown links
    /// get rendered. A failure is logged at trace level and otherwise ignored;
    /// the short menu settle pause only follows a successful dispatch.
    async fn reveal_menus<D: PageDriver>(&self, driver: &mut D, url: &str) {
        match driver.reveal_menus(&MENU_SELECTORS).await {
            Ok(()) => sleep(self.config.limits.menu_settle_delay()).await,
            Err(e) => ::log::trace!("Menu reveal skipped on {}: {}", url, e),
        }
    }
}
