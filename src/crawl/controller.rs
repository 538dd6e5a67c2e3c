// src/crawl/controller.rs
// =============================================================================
// The crawl itself: a breadth-first walk, one depth level at a time.
//
// How it works:
// 1. The seeds form the first frontier (depth 0)
// 2. Every unit in the frontier is admitted through the visited ledger;
//    repeats are dropped before anything is fetched
// 3. Admitted units are visited by a bounded pool of concurrent workers:
//    fetch -> extract title/description -> append record -> pick links
// 4. The links each page picked become the next frontier, one level deeper
// 5. Stop when the frontier is empty or the depth limit is reached
//
// A failed fetch only loses that one page. Its siblings carry on.
//
// Picking links from a page:
// - run every link through the LinkFilter
// - skip links already in the visited ledger, and repeats on the same page
// - shuffle if asked to, then keep the first `max_links_per_page`
// Links past the cap are dropped for good; they are not queued for later.
// =============================================================================

use crate::config::CrawlConfig;
use crate::crawl::filter::LinkFilter;
use crate::crawl::visited::{normalize_url, VisitedSet};
use crate::error::{CrawlError, FetchError};
use crate::extract::ContentExtractor;
use crate::fetch::{Fetcher, ParsedDocument};
use crate::sink::{PageRecord, ResultSink};
use futures::stream::{self, StreamExt};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlUnit {
    pub url: String,
    /// Link hops from the nearest seed
    pub depth: usize,
}

/// Counters for one run, logged when the crawl ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub seeds: usize,
    pub admitted: usize,
    pub duplicates_skipped: usize,
    pub fetched: usize,
    pub failed: usize,
    pub records: usize,
    pub links_rejected: usize,
    pub links_over_cap: usize,
    pub cancelled: bool,
}

// Updated from many workers at once, so everything is atomic
#[derive(Debug, Default)]
struct Counters {
    admitted: AtomicUsize,
    duplicates_skipped: AtomicUsize,
    fetched: AtomicUsize,
    failed: AtomicUsize,
    links_rejected: AtomicUsize,
    links_over_cap: AtomicUsize,
    cancelled: AtomicBool,
}

pub struct Crawler<F: Fetcher> {
    config: CrawlConfig,
    fetcher: F,
    filter: LinkFilter,
    extractor: ContentExtractor,
    visited: VisitedSet,
    sink: ResultSink,
    cancel: CancellationToken,
    counters: Counters,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Self {
        Self {
            filter: LinkFilter::new(&config.link_policy),
            extractor: ContentExtractor::new(config.desc_max_len),
            config,
            fetcher,
            visited: VisitedSet::new(),
            sink: ResultSink::new(),
            cancel: CancellationToken::new(),
            counters: Counters::default(),
        }
    }

    /// Cancelling this token stops the crawl; pages already recorded are kept
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }

    #[cfg(test)]
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Crawls from `seeds` (depth 0) until the depth limit is reached, the
    /// frontier runs dry, or the run is cancelled.
    pub async fn crawl(&self, seeds: &[String]) -> Result<CrawlStats, CrawlError> {
        let seeds: Vec<&str> = seeds
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if seeds.is_empty() {
            return Err(CrawlError::NoSeeds);
        }

        let mut frontier: Vec<CrawlUnit> = seeds
            .iter()
            .map(|url| CrawlUnit { url: url.to_string(), depth: 0 })
            .collect();
        let mut depth = 0;

        while !frontier.is_empty() && depth < self.config.max_depth {
            let admitted = self.admit(frontier);
            info!(depth, pages = admitted.len(), "crawling level");

            let mut visits = stream::iter(admitted)
                .map(|unit| self.visit(unit))
                .buffer_unordered(self.config.concurrency);

            let mut next = Vec::new();
            loop {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        // Dropping `visits` aborts every in-flight fetch
                        warn!(depth, "crawl cancelled, keeping records gathered so far");
                        self.counters.cancelled.store(true, Ordering::Relaxed);
                        return Ok(self.stats(seeds.len()));
                    }
                    children = visits.next() => match children {
                        Some(children) => next.extend(children),
                        None => break,
                    },
                }
            }

            frontier = next;
            depth += 1;
        }

        let stats = self.stats(seeds.len());
        info!(
            records = stats.records,
            fetched = stats.fetched,
            failed = stats.failed,
            "crawl finished"
        );
        Ok(stats)
    }

    // Marks each unit visited; repeats and too-deep units are dropped quietly
    fn admit(&self, frontier: Vec<CrawlUnit>) -> Vec<CrawlUnit> {
        frontier
            .into_iter()
            .filter(|unit| {
                if unit.depth >= self.config.max_depth {
                    return false;
                }
                if self.visited.try_visit(&unit.url) {
                    self.counters.admitted.fetch_add(1, Ordering::Relaxed);
                    true
                } else {
                    self.counters.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
                    false
                }
            })
            .collect()
    }

    // Fetches one page, records it, and returns the children it selected
    async fn visit(&self, unit: CrawlUnit) -> Vec<CrawlUnit> {
        info!(url = %unit.url, depth = unit.depth, "crawling");

        let document = match self.fetch(&unit.url).await {
            Ok(document) => document,
            Err(e) => {
                warn!(url = %unit.url, error = %e, "failed to fetch, skipping");
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        };
        self.counters.fetched.fetch_add(1, Ordering::Relaxed);

        let extracted = self.extractor.extract(&document);
        self.sink
            .append(PageRecord::new(extracted.title, &unit.url, extracted.description));

        if let Some(delay) = self.config.politeness_delay() {
            tokio::time::sleep(delay).await;
        }

        if unit.depth + 1 >= self.config.max_depth {
            return Vec::new();
        }

        self.select_links(&document)
            .into_iter()
            .map(|url| CrawlUnit { url, depth: unit.depth + 1 })
            .collect()
    }

    // The fetcher gets its own timeout too; this one guards against fetchers
    // that ignore theirs
    async fn fetch(&self, url: &str) -> Result<ParsedDocument, FetchError> {
        let timeout = self.config.timeout();
        match tokio::time::timeout(
            timeout,
            self.fetcher.fetch(url, &self.config.user_agent, timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        }
    }

    fn select_links(&self, document: &ParsedDocument) -> Vec<String> {
        let mut seen_on_page = HashSet::new();
        let mut candidates = Vec::new();

        for link in document.links() {
            if !self.filter.is_eligible(link) {
                debug!(url = %link, "link rejected by filter");
                self.counters.links_rejected.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            if self.visited.contains(link) || !seen_on_page.insert(normalize_url(link)) {
                continue;
            }
            candidates.push(link.clone());
        }

        if self.config.shuffle_links {
            candidates.shuffle(&mut rand::rng());
        }

        let cap = self.config.max_links_per_page;
        if candidates.len() > cap {
            let dropped = candidates.len() - cap;
            debug!(page = %document.url, dropped, "links over the per-page cap dropped");
            self.counters.links_over_cap.fetch_add(dropped, Ordering::Relaxed);
            candidates.truncate(cap);
        }

        candidates
    }

    fn stats(&self, seeds: usize) -> CrawlStats {
        CrawlStats {
            seeds,
            admitted: self.counters.admitted.load(Ordering::Relaxed),
            duplicates_skipped: self.counters.duplicates_skipped.load(Ordering::Relaxed),
            fetched: self.counters.fetched.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            records: self.sink.len(),
            links_rejected: self.counters.links_rejected.load(Ordering::Relaxed),
            links_over_cap: self.counters.links_over_cap.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
        }
    }
}
