use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// URL substrings that move a pending page ahead of the rest of the frontier
pub const PRIORITY_KEYWORDS: [&str; 16] = [
    "about",
    "service",
    "product",
    "career",
    "job",
    "team",
    "contact",
    "technology",
    "industry",
    "solution",
    "portfolio",
    "mission",
    "vision",
    "who-we-are",
    "what-we-do",
    "insight",
];

/// Configuration for a site crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether the browser should run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page, time and output bounds of one crawl
    #[serde(default)]
    pub limits: CrawlLimits,

    /// Case-insensitive URL substrings that mark a page as high priority
    #[serde(default = "default_priority_keywords")]
    pub priority_keywords: Vec<String>,
}

/// Bounds applied to every crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlLimits {
    /// Maximum number of pages fetched in one crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Hard timeout for a single navigation
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Pause after navigation so late scripts can populate the page
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Pause after hover events were dispatched on navigation menus
    #[serde(default = "default_menu_settle_delay_ms")]
    pub menu_settle_delay_ms: u64,

    /// Maximum number of characters in the aggregated output
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
}

impl CrawlLimits {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn menu_settle_delay(&self) -> Duration {
        Duration::from_millis(self.menu_settle_delay_ms)
    }
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            menu_settle_delay_ms: default_menu_settle_delay_ms(),
            max_output_chars: default_max_output_chars(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            limits: CrawlLimits::default(),
            priority_keywords: default_priority_keywords(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_max_pages() -> usize {
    1500
}

fn default_navigation_timeout_ms() -> u64 {
    10_000
}

fn default_settle_delay_ms() -> u64 {
    400
}

fn default_menu_settle_delay_ms() -> u64 {
    100
}

fn default_max_output_chars() -> usize {
    200_000
}

fn default_priority_keywords() -> Vec<String> {
    PRIORITY_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
