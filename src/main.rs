use clap::Parser;
use site_corpus::{CrawlerConfig, SiteCorpus, server};
use std::path::Path;
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Crawl {
            url,
            max_pages,
            output,
        } => {
            let mut corpus = SiteCorpus::new(url);
            if let Some(path) = &args.config {
                corpus = match corpus.with_config_file(path) {
                    Ok(corpus) => corpus,
                    Err(e) => {
                        ::log::error!("Failed to load configuration: {}", e);
                        return ExitCode::FAILURE;
                    }
                };
            }
            if let Some(webdriver_url) = args.webdriver_url {
                corpus = corpus.with_webdriver_url(webdriver_url);
            }
            if let Some(max_pages) = max_pages {
                corpus = corpus.with_max_pages(max_pages);
            }

            let start_time = std::time::Instant::now();
            let outcome = match corpus.crawl().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    ::log::error!("Crawl failed: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            ::log::info!(
                "Crawling complete - {} pages in {:.2} seconds",
                outcome.pages_visited(),
                start_time.elapsed().as_secs_f64()
            );

            match output {
                Some(path) => {
                    if let Err(e) = tokio::fs::write(&path, &outcome.text).await {
                        ::log::error!("Failed to write {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                }
                None => println!("{}", outcome.text),
            }
            ExitCode::SUCCESS
        }
        Command::Serve { bind } => {
            let config = match load_config(args.config.as_deref(), args.webdriver_url) {
                Ok(config) => config,
                Err(e) => {
                    ::log::error!("Failed to load configuration: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = server::serve(&bind, config).await {
                ::log::error!("Server error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

/// Config file (or defaults), then WEBDRIVER_URL, then the command line
fn load_config(
    path: Option<&Path>,
    webdriver_url: Option<String>,
) -> Result<CrawlerConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => CrawlerConfig::from_file(path)?,
        None => CrawlerConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(webdriver_url) = webdriver_url {
        config.webdriver_url = webdriver_url;
    }
    Ok(config)
}
