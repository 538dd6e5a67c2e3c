// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below describes every flag, and clap
// generates the parser, --help and --version from it.
//
// The Cli struct is only the raw user input. `Cli::crawl_config()` turns it
// into a validated CrawlConfig, which is what the crawler actually uses.
// =============================================================================

use crate::config::{self, CrawlConfig, LinkPolicy};
use crate::error::ConfigError;
use crate::logging::LogFormat;
use crate::sink::OutputMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-harvester",
    version = "0.1.0",
    about = "Crawl the web from seed URLs and save page titles and descriptions as JSON",
    long_about = "page-harvester starts from one or more seed URLs, visits a limited number of \
                  links per page up to a fixed depth, and writes a JSON array of \
                  {title, url, desc} records."
)]
pub struct Cli {
    /// Seed URLs to start from (a built-in list is used when none are given)
    pub seeds: Vec<String>,

    /// Maximum crawl depth (1 = only the seeds)
    #[arg(long, default_value_t = config::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of links followed from each page
    #[arg(long = "max-links", default_value_t = config::DEFAULT_MAX_LINKS_PER_PAGE)]
    pub max_links_per_page: usize,

    /// User-Agent header sent with every request
    #[arg(long, default_value = config::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Shuffle each page's links before picking which ones to follow
    #[arg(long)]
    pub shuffle: bool,

    /// Maximum description length in characters
    #[arg(long, default_value_t = config::DEFAULT_DESC_MAX_LEN)]
    pub desc_max_len: usize,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Do not follow HTTP redirects
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Drop pages served with a 4xx/5xx status instead of recording them
    #[arg(long)]
    pub fail_on_http_errors: bool,

    /// Follow links that contain a '#' fragment
    #[arg(long)]
    pub allow_fragments: bool,

    /// Shortest URL considered worth following
    #[arg(long, default_value_t = config::DEFAULT_MIN_URL_LEN)]
    pub min_url_len: usize,

    /// Extra substring that excludes a URL (repeatable)
    #[arg(long = "deny", value_name = "SUBSTRING")]
    pub deny: Vec<String>,

    /// Start with an empty denylist instead of the built-in one
    #[arg(long)]
    pub no_default_deny: bool,

    /// Pause after each fetch, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 0)]
    pub politeness_delay_ms: u64,

    /// Output file ('-' writes to stdout)
    #[arg(short, long, default_value = "database.json")]
    pub output: PathBuf,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputMode::Array)]
    pub format: OutputMode,

    /// Log line format (logs always go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Seeds from the command line, or the built-in list
    pub fn seed_urls(&self) -> Vec<String> {
        if self.seeds.is_empty() {
            config::DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.seeds.clone()
        }
    }

    /// Builds and validates the crawl settings
    pub fn crawl_config(&self) -> Result<CrawlConfig, ConfigError> {
        let mut denylist: Vec<String> = if self.no_default_deny {
            Vec::new()
        } else {
            LinkPolicy::default().denylist
        };
        denylist.extend(self.deny.iter().cloned());

        let config = CrawlConfig {
            max_depth: self.max_depth,
            max_links_per_page: self.max_links_per_page,
            user_agent: self.user_agent.clone(),
            timeout_ms: self.timeout_ms,
            shuffle_links: self.shuffle,
            desc_max_len: self.desc_max_len,
            concurrency: self.concurrency,
            follow_redirects: !self.no_follow_redirects,
            ignore_http_errors: !self.fail_on_http_errors,
            politeness_delay_ms: self.politeness_delay_ms,
            link_policy: LinkPolicy {
                reject_fragments: !self.allow_fragments,
                min_url_len: self.min_url_len,
                denylist,
            },
        };

        config.validate()?;
        Ok(config)
    }
}
