use crate::config::CrawlerConfig;
use crate::crawlers::driver::PageDriver;
use crate::error::DriverError;
use crate::parsers::RawPage;
use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};

/// Dispatches hover/enter events on every element matching `arguments[0]`
const REVEAL_MENUS_SCRIPT: &str = r#"
const items = document.querySelectorAll(arguments[0]);
items.forEach(item => {
    item.dispatchEvent(new MouseEvent('mouseover', { bubbles: true }));
    item.dispatchEvent(new MouseEvent('mouseenter', { bubbles: true }));
});
return items.length;
"#;

/// Reads the rendered DOM state. `arguments[0]` is the list of link
/// selectors, `arguments[1]` the button selector. Anchors are deduplicated
/// by element, so an anchor matched by several selectors appears once.
const SNAPSHOT_SCRIPT: &str = r#"
const linkSelectors = arguments[0];
const buttonSelector = arguments[1];
const title = document.title || null;
if (!document.body) {
    return { title: title, body_text: null, anchors: [], buttons: [] };
}
const seen = new Set();
const anchors = [];
for (const selector of linkSelectors) {
    let matches;
    try {
        matches = document.querySelectorAll(selector);
    } catch (e) {
        continue;
    }
    for (const a of matches) {
        const href = a.getAttribute('href');
        if (seen.has(a) || !a.href || href === null) {
            continue;
        }
        seen.add(a);
        anchors.push({ text: a.innerText || a.textContent || '', href: href });
    }
}
const buttons = Array.from(document.querySelectorAll(buttonSelector))
    .map(b => b.innerText || '');
return {
    title: title,
    body_text: document.body.innerText || '',
    anchors: anchors,
    buttons: buttons
};
"#;

/// Common local WebDriver endpoints tried when the configured one fails
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444",
];

/// Browser tab driven over the WebDriver protocol.
///
/// The session is closed by [`PageDriver::close`]. If the value is dropped
/// while still open (panic, cancelled request) the close is spawned onto the
/// current runtime instead.
pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    /// Open a new browser session through the configured WebDriver endpoint
    pub async fn connect(config: &CrawlerConfig) -> Result<Self, DriverError> {
        let client = connect_to_webdriver(config).await?;

        let timeouts =
            TimeoutConfiguration::new(None, Some(config.limits.navigation_timeout()), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            ::log::warn!("Failed to set WebDriver page load timeout: {}", e);
        }

        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> Result<&Client, DriverError> {
        self.client.as_ref().ok_or(DriverError::Closed)
    }
}

#[async_trait]
impl PageDriver for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.client()?
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn reveal_menus(&mut self, selectors: &[&str]) -> Result<(), DriverError> {
        let matched = self
            .client()?
            .execute(REVEAL_MENUS_SCRIPT, vec![json!(selectors.join(", "))])
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        ::log::trace!("Dispatched hover events on {} menu elements", matched);
        Ok(())
    }

    async fn snapshot(
        &mut self,
        link_selectors: &[&str],
        button_selector: &str,
    ) -> Result<RawPage, DriverError> {
        let value = self
            .client()?
            .execute(
                SNAPSHOT_SCRIPT,
                vec![json!(link_selectors), json!(button_selector)],
            )
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.client.take() {
            Some(client) => client
                .close()
                .await
                .map_err(|e| DriverError::Close(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                ::log::warn!("Browser session dropped while open, closing it in the background");
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close abandoned browser session: {}", e);
                    }
                });
            }
            Err(_) => {
                ::log::error!("Browser session dropped outside a runtime and could not be closed");
            }
        }
    }
}

/// Chrome capabilities: eager page loading returns once the DOM is parsed
fn capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec![
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
    ];
    if headless {
        args.push("--headless=new");
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("pageLoadStrategy".to_string(), json!("eager"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connects to the configured WebDriver instance, then to the common local ones
async fn connect_to_webdriver(config: &CrawlerConfig) -> Result<Client, DriverError> {
    let webdriver_url = config.webdriver_url.as_str();
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config.headless));

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        // Fallback failures are not logged to avoid log spam
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(DriverError::Connect(format!(
        "{}: {}",
        webdriver_url, first_error
    )))
}
