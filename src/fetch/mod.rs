// src/fetch/mod.rs
// =============================================================================
// This module turns a URL into a ParsedDocument.
//
// Submodules:
// - document: the parsed page snapshot (title, meta tags, paragraphs, links)
// - http: the real fetcher, built on reqwest
//
// The crawler only talks to the `Fetcher` trait, so tests can swap in an
// in-memory fetcher and never touch the network.
// =============================================================================

mod document;
mod http;

pub use document::ParsedDocument;
pub use http::HttpFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// Anything that can fetch and parse a page
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` with the given User-Agent, giving up after `timeout`.
    async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<ParsedDocument, FetchError>;
}
