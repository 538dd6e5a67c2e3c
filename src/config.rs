// src/config.rs
// =============================================================================
// Crawl settings.
//
// A CrawlConfig is built once (from the command line, see cli.rs), validated,
// and then shared read-only by every part of the crawl. Nothing changes it
// while a run is in progress.
// =============================================================================

use crate::error::ConfigError;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MAX_LINKS_PER_PAGE: usize = 10;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DESC_MAX_LEN: usize = 200;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_MIN_URL_LEN: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Used when no seeds are given on the command line
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://www.nasa.gov",
    "https://www.spacex.com",
    "https://en.wikipedia.org/wiki/Aerospace_engineering",
    "https://www.lockheedmartin.com",
    "https://www.boeing.com",
];

// Substrings that mark login pages and social share/referral traps
pub const DEFAULT_DENYLIST: &[&str] = &[
    "login",
    "signin",
    "sign-in",
    "signup",
    "sign-up",
    "logout",
    "/auth",
    "oauth",
    "facebook.com/sharer",
    "twitter.com/intent",
    "x.com/intent",
    "linkedin.com/share",
    "pinterest.com/pin/create",
    "reddit.com/submit",
    "wa.me/",
];

/// Which discovered links are worth following
#[derive(Debug, Clone, Serialize)]
pub struct LinkPolicy {
    /// Treat `page#section` links as the same page and skip them
    pub reject_fragments: bool,
    /// Anything shorter than this cannot be a real page URL
    pub min_url_len: usize,
    /// Case-insensitive substrings that disqualify a URL
    pub denylist: Vec<String>,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            reject_fragments: true,
            min_url_len: DEFAULT_MIN_URL_LEN,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything a crawl run needs to know
#[derive(Debug, Clone, Serialize)]
pub struct CrawlConfig {
    /// Seeds are depth 0; nothing at this depth or deeper is fetched
    pub max_depth: usize,
    /// How many children one page may dispatch
    pub max_links_per_page: usize,
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Randomise candidate order before applying the per-page cap
    pub shuffle_links: bool,
    pub desc_max_len: usize,
    /// Width of the worker pool for one depth level
    pub concurrency: usize,
    pub follow_redirects: bool,
    /// Keep pages served with 4xx/5xx status codes
    pub ignore_http_errors: bool,
    /// Pause after each fetch, per worker
    pub politeness_delay_ms: u64,
    pub link_policy: LinkPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_links_per_page: DEFAULT_MAX_LINKS_PER_PAGE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            shuffle_links: false,
            desc_max_len: DEFAULT_DESC_MAX_LEN,
            concurrency: DEFAULT_CONCURRENCY,
            follow_redirects: true,
            ignore_http_errors: true,
            politeness_delay_ms: 0,
            link_policy: LinkPolicy::default(),
        }
    }
}

impl CrawlConfig {
    /// Checks the numeric bounds a crawl relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.desc_max_len == 0 {
            return Err(ConfigError::ZeroDescriptionLength);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn politeness_delay(&self) -> Option<Duration> {
        (self.politeness_delay_ms > 0).then(|| Duration::from_millis(self.politeness_delay_ms))
    }
}
