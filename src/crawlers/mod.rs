pub mod driver;
pub mod site;
pub mod static_site;
pub mod web;

#[cfg(test)]
mod tests;

pub use driver::PageDriver;
pub use site::{CrawlOutcome, CrawlSession, SiteCrawler};
pub use static_site::{DriverHistory, StaticPage, StaticSiteDriver};
pub use web::WebDriverSession;
