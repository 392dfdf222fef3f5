use crate::config::CrawlerConfig;
use crate::crawlers::{SiteCrawler, StaticPage, StaticSiteDriver};
use crate::error::{CrawlError, DriverError};

fn fast_config() -> CrawlerConfig {
    let mut config = CrawlerConfig::default();
    config.limits.settle_delay_ms = 0;
    config.limits.menu_settle_delay_ms = 0;
    config.limits.navigation_timeout_ms = 200;
    config
}

fn count_blocks(text: &str) -> usize {
    text.matches("\nPAGE: ").count() + usize::from(text.starts_with("PAGE: "))
}

#[tokio::test]
async fn test_single_page_without_links() {
    let driver = StaticSiteDriver::new().with_page(
        "https://example.com/",
        "<html><head><title>Home</title></head><body><p>Just one page.</p></body></html>",
    );
    let history = driver.history();

    let outcome = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com", driver)
        .await
        .unwrap();

    assert_eq!(outcome.visited, vec!["https://example.com/"]);
    assert_eq!(outcome.frontier_remaining, 0);
    assert_eq!(outcome.pages_failed, 0);
    assert_eq!(count_blocks(&outcome.text), 1);
    assert!(outcome.text.starts_with(
        "========================================\nPAGE: Home\nURL: https://example.com/\n"
    ));
    assert!(outcome.text.contains("CONTENT:\nJust one page.\n"));
    assert!(history.is_closed());
}

#[tokio::test]
async fn test_unparseable_seed_fails_before_navigation() {
    let driver = StaticSiteDriver::new();
    let history = driver.history();

    let err = SiteCrawler::new(fast_config())
        .crawl_with("not a url", driver)
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    assert!(err.is_client_error());
    assert!(history.navigations().is_empty());
}

#[tokio::test]
async fn test_empty_seed_is_a_client_error() {
    let err = SiteCrawler::new(fast_config())
        .crawl_with("   ", StaticSiteDriver::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::MissingUrl));
}

#[tokio::test]
async fn test_navigation_timeout_marks_page_visited_and_continues() {
    let driver = StaticSiteDriver::new()
        .with_page(
            "https://example.com/",
            r#"<html><head><title>Home</title></head><body>
                <a href="/slow">Slow page</a>
                <a href="/fast">Fast page</a>
            </body></html>"#,
        )
        .with_behavior("https://example.com/slow", StaticPage::Hang)
        .with_page(
            "https://example.com/fast",
            "<html><head><title>Fast</title></head><body>quick</body></html>",
        );
    let history = driver.history();

    let outcome = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com/", driver)
        .await
        .unwrap();

    assert_eq!(outcome.pages_visited(), 3);
    assert!(outcome.visited.contains(&"https://example.com/slow".to_string()));
    assert_eq!(outcome.pages_failed, 1);
    assert!(outcome.text.contains(
        "PAGE: Page Not Loaded\nURL: https://example.com/slow\n========================================\n\nCONTENT:\n\n"
    ));
    assert!(outcome.text.contains("PAGE: Fast\nURL: https://example.com/fast\n"));
    assert!(history.is_closed());
}

#[tokio::test]
async fn test_same_href_from_two_elements_is_fetched_once() {
    let driver = StaticSiteDriver::new()
        .with_page(
            "https://example.com/",
            r#"<html><body>
                <nav><a href="/pricing">Pricing</a></nav>
                <footer><a href="/pricing#plans">See plans</a></footer>
            </body></html>"#,
        )
        .with_page(
            "https://example.com/pricing",
            r#"<html><body><a href="/">Home</a><a href="/pricing">Pricing</a></body></html>"#,
        );
    let history = driver.history();

    let outcome = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com/", driver)
        .await
        .unwrap();

    let fetched = history.navigations();
    assert_eq!(
        fetched,
        vec!["https://example.com/", "https://example.com/pricing"]
    );
    assert_eq!(outcome.frontier_remaining, 0);
    assert!(outcome.text.contains("- [Link] Pricing: https://example.com/pricing\n"));
    assert!(outcome.text.contains("- [Link] See plans: https://example.com/pricing\n"));
}

#[tokio::test]
async fn test_unreachable_page_does_not_abort_crawl() {
    let driver = StaticSiteDriver::new()
        .with_page(
            "https://example.com/",
            r#"<html><body><a href="/gone">Gone</a><a href="/here">Here</a></body></html>"#,
        )
        .with_behavior(
            "https://example.com/gone",
            StaticPage::Unreachable("net::ERR_CONNECTION_RESET".to_string()),
        )
        .with_page("https://example.com/here", "<html><body>present</body></html>");

    let outcome = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com/", driver)
        .await
        .unwrap();

    assert_eq!(outcome.pages_visited(), 3);
    assert_eq!(outcome.pages_failed, 1);
    assert!(outcome.text.contains("CONTENT:\npresent\n"));
}

#[tokio::test]
async fn test_failing_menu_reveal_is_ignored() {
    let driver = StaticSiteDriver::new()
        .with_page(
            "https://example.com/",
            r#"<html><head><title>Home</title></head><body>
                <header><a href="/team">Team</a></header><p>Welcome</p>
            </body></html>"#,
        )
        .with_page(
            "https://example.com/team",
            "<html><head><title>Team</title></head><body>People</body></html>",
        )
        .with_failing_menu_reveal();

    let outcome = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com/", driver)
        .await
        .unwrap();

    assert_eq!(outcome.pages_visited(), 2);
    assert_eq!(outcome.pages_failed, 0);
    assert!(outcome.text.contains("CONTENT:\nTeam Welcome\n"));
    assert!(outcome.text.contains("PAGE: Team\n"));
}

#[tokio::test]
async fn test_failed_release_after_crawl_is_a_session_error() {
    let driver = StaticSiteDriver::new()
        .with_page(
            "https://example.com/",
            r#"<html><body><a href="/about">About</a></body></html>"#,
        )
        .with_page("https://example.com/about", "<html><body>About us</body></html>")
        .with_failing_close();
    let history = driver.history();

    let err = SiteCrawler::new(fast_config())
        .crawl_with("https://example.com/", driver)
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Session(DriverError::Close(_))));
    assert!(!err.is_client_error());
    assert_eq!(
        history.navigations(),
        vec!["https://example.com/", "https://example.com/about"]
    );
    assert!(history.is_closed());
}
