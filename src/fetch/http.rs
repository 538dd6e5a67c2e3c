// src/fetch/http.rs
// =============================================================================
// The real fetcher: downloads a page over HTTP(S) and parses it.
//
// Behaviour:
// - Only http:// and https:// URLs are requested
// - Redirects are followed (up to 10) unless disabled
// - 4xx/5xx pages are still parsed and returned unless the crawl is set to
//   fail on HTTP errors
// - Responses that are clearly not HTML (images, PDFs, ...) are rejected
// - Every request carries its own timeout
//
// One reqwest::Client is shared by every request so connections are pooled.
// =============================================================================

use super::{Fetcher, ParsedDocument};
use crate::config::CrawlConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    ignore_http_errors: bool,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        let policy = if config.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .redirect(policy)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            ignore_http_errors: config.ignore_http_errors,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<ParsedDocument, FetchError> {
        let target = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(target.scheme().to_string()));
        }

        let response = self
            .client
            .get(target)
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() && !self.ignore_http_errors {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_markup(content_type) {
                return Err(FetchError::UnsupportedContentType(content_type.to_string()));
            }
        }

        // Relative links resolve against where we ended up, not where we started
        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        Ok(ParsedDocument::parse(url, &html, &final_url))
    }
}

// Timeouts get their own variant so the log line says what happened
fn classify_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Http(error)
    }
}

// text/*, application/xml and any +xml type can be parsed as a page
fn is_markup(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/") || mime == "application/xml" || mime.ends_with("+xml")
}
