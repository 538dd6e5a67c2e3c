// src/crawl/visited.rs
// =============================================================================
// The visited ledger: every URL the crawl has scheduled, recorded once.
//
// `try_visit` checks and marks in one step. Two workers that discover the same
// URL at the same moment cannot both win, so no page is fetched twice.
//
// URLs are normalised before they are stored: parsed with the `url` crate
// (lowercase scheme and host, default port dropped, empty path becomes "/")
// and the #fragment removed, since fragments never reach the server.
// =============================================================================

use dashmap::DashSet;
use url::Url;

#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true, and records the URL, the first time it is seen.
    pub fn try_visit(&self, url: &str) -> bool {
        self.seen.insert(normalize_url(url))
    }

    /// Read-only membership check
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(&normalize_url(url))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Canonical form used as the dedup key
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        // Unparsable input still dedups against itself
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_visit_wins() {
        let visited = VisitedSet::new();
        assert!(visited.try_visit("https://example.com/a"));
        assert!(!visited.try_visit("https://example.com/a"));
        assert!(visited.contains("https://example.com/a"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_equivalent_urls_share_one_entry() {
        let visited = VisitedSet::new();
        assert!(visited.try_visit("https://Example.COM"));
        assert!(!visited.try_visit("https://example.com/"));
        assert!(!visited.try_visit("https://example.com:443/#intro"));
        assert!(!visited.try_visit("  https://example.com/  "));
    }

    #[test]
    fn test_contains_does_not_record() {
        let visited = VisitedSet::new();
        assert!(!visited.contains("https://example.com/b"));
        assert!(visited.is_empty());
        assert!(visited.try_visit("https://example.com/b"));
    }

    #[test]
    fn test_unparsable_urls_still_dedup() {
        let visited = VisitedSet::new();
        assert!(visited.try_visit("not a url"));
        assert!(!visited.try_visit("not a url"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_admit_once() {
        let visited = Arc::new(VisitedSet::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let visited = Arc::clone(&visited);
                tokio::spawn(async move { visited.try_visit("https://example.com/race") })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }
}
