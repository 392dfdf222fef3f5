use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-corpus")]
#[command(about = "Crawls a website and collects its visible text into one corpus")]
#[command(version)]
pub struct Args {
    /// Path to a JSON crawler configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (overrides the config file and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl one site and print the corpus
    Crawl {
        /// Seed URL; only pages on its hostname are crawled
        url: String,

        /// Maximum number of pages to fetch
        #[arg(long)]
        max_pages: Option<usize>,

        /// Write the corpus to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the crawl endpoint over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
}
