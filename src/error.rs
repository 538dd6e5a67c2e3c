// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Only a few failures are allowed to stop a run:
// - ConfigError: bad settings, detected before any request is made
// - CrawlError: nothing to crawl
// - SinkError: the final JSON could not be produced or written
//
// FetchError is different: it belongs to a single URL. The controller logs it,
// drops that URL and carries on with the rest of the crawl.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a single page could not be fetched and parsed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Invalid crawl settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max depth must be at least 1")]
    ZeroDepth,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("description length limit must be greater than zero")]
    ZeroDescriptionLength,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Failures that abort a crawl before it starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrawlError {
    #[error("no seed URLs to crawl")]
    NoSeeds,
}

/// Failures while turning records into output
#[derive(Debug, Error)]
pub enum SinkError {
    // A record slipped past sanitisation. This is a bug, not bad input.
    #[error("record for {url} has an unsanitized {field} field")]
    Unsanitized { url: String, field: &'static str },
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
