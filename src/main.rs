// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Build the crawl settings and the HTTP fetcher
// 4. Crawl from the seed URLs, stopping early on Ctrl-C
// 5. Write the harvested pages as JSON
// 6. Exit with proper code (0 = success, 2 = error)
//
// A page that fails to load is not an error for the run: it is logged and
// skipped. Only bad settings or failing to write the output end in exit 2.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl settings
mod crawl; // src/crawl/ - the crawl controller, link filter and visited ledger
mod error; // src/error.rs - error types
mod extract; // src/extract.rs - title/description extraction
mod fetch; // src/fetch/ - HTTP fetching and HTML parsing
mod logging; // src/logging.rs - tracing setup
mod sink; // src/sink.rs - page records and JSON output

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::Crawler;
use fetch::HttpFetcher;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // stderr directly: logging may not be set up yet
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose, cli.quiet);

    let config = cli.crawl_config().context("invalid crawl settings")?;
    let seeds = cli.seed_urls();
    info!(
        seeds = seeds.len(),
        max_depth = config.max_depth,
        max_links_per_page = config.max_links_per_page,
        concurrency = config.concurrency,
        "starting crawl"
    );

    let fetcher = HttpFetcher::new(&config).context("failed to build HTTP client")?;

    // Ctrl-C stops the crawl; whatever was gathered is still written
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping crawl");
            on_signal.cancel();
        }
    });

    let crawler = Crawler::new(config, fetcher).with_cancellation(cancel);
    let stats = crawler.crawl(&seeds).await?;
    info!(stats = %serde_json::to_string(&stats)?, "crawl summary");

    let written = crawler
        .sink()
        .write_to(&cli.output, cli.format)
        .context("failed to write results")?;

    info!(records = written, output = %cli.output.display(), "saved results");
    Ok(0)
}
