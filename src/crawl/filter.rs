// src/crawl/filter.rs
// =============================================================================
// Decides whether a discovered link is worth following.
//
// A link is rejected when it is:
// - empty, or too short to be a real page URL
// - not http:// or https://
// - a #fragment link (when the policy treats those as the same page)
// - matching any denylist substring (login pages, social share links, ...)
//
// All checks are case-insensitive. The filter is pure: it never looks at the
// visited ledger, so the same link always gets the same answer.
// =============================================================================

use crate::config::LinkPolicy;

#[derive(Debug, Clone)]
pub struct LinkFilter {
    reject_fragments: bool,
    min_url_len: usize,
    // Lowercased once so each check is a plain substring search
    denylist: Vec<String>,
}

impl LinkFilter {
    pub fn new(policy: &LinkPolicy) -> Self {
        Self {
            reject_fragments: policy.reject_fragments,
            min_url_len: policy.min_url_len,
            denylist: policy
                .denylist
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn is_eligible(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() || candidate.chars().count() < self.min_url_len {
            return false;
        }

        let lowered = candidate.to_lowercase();
        if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
            return false;
        }

        if self.reject_fragments && lowered.contains('#') {
            return false;
        }

        !self.denylist.iter().any(|denied| lowered.contains(denied.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> LinkFilter {
        LinkFilter::new(&LinkPolicy::default())
    }

    #[test]
    fn test_accepts_plain_pages() {
        let filter = default_filter();
        assert!(filter.is_eligible("https://www.nasa.gov/missions/"));
        assert!(filter.is_eligible("http://example.com/about"));
    }

    #[test]
    fn test_rejects_empty_and_short() {
        let filter = default_filter();
        assert!(!filter.is_eligible(""));
        assert!(!filter.is_eligible("   "));
        assert!(!filter.is_eligible("http://a"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        let filter = default_filter();
        assert!(!filter.is_eligible("mailto:team@example.com"));
        assert!(!filter.is_eligible("javascript:void(0)"));
        assert!(!filter.is_eligible("ftp://files.example.com/pub"));
        assert!(filter.is_eligible("HTTPS://EXAMPLE.COM/Page"));
    }

    #[test]
    fn test_fragment_policy() {
        assert!(!default_filter().is_eligible("https://example.com/page#section"));

        let lenient = LinkFilter::new(&LinkPolicy {
            reject_fragments: false,
            ..LinkPolicy::default()
        });
        assert!(lenient.is_eligible("https://example.com/page#section"));
    }

    #[test]
    fn test_denylist_is_case_insensitive() {
        let filter = default_filter();
        assert!(!filter.is_eligible("https://example.com/LOGIN?next=/"));
        assert!(!filter.is_eligible("https://www.facebook.com/sharer/sharer.php?u=x"));
        assert!(!filter.is_eligible("https://Twitter.com/intent/tweet?text=hi"));
    }

    #[test]
    fn test_custom_denylist() {
        let filter = LinkFilter::new(&LinkPolicy {
            denylist: vec!["  Casino ".to_string(), String::new()],
            ..LinkPolicy::default()
        });
        assert!(!filter.is_eligible("https://example.com/casino/offers"));
        assert!(filter.is_eligible("https://example.com/login"));
    }
}
