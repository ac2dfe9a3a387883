//! Crawl pipeline for pagelens
//!
//! One crawl is a straight pipeline: normalize the target URL, fetch the
//! page, analyze the HTML, classify the links, probe them for liveness,
//! assemble the report. [`Crawler`] owns the pipeline stages and turns any
//! stage failure into the terminal-error form of [`CrawlResult`]; it never
//! panics or propagates an error upward, which is what lets the job manager
//! guarantee its callback always receives a fully-formed result.

mod analyzer;
mod checker;
mod fetcher;
mod links;

pub use analyzer::{analyze_html, PageFacts};
pub use checker::LinkChecker;
pub use fetcher::{is_html_content_type, FetchedPage, Fetcher};
pub use links::{classify_links, ClassifiedLinks};

use crate::config::Config;
use crate::report::CrawlResult;
use crate::url::normalize_target_url;
use tokio_util::sync::CancellationToken;

/// Executes single-page crawls under a fixed configuration
///
/// A `Crawler` is cheap to share behind an `Arc`; all state is the two
/// configured HTTP clients.
pub struct Crawler {
    fetcher: Fetcher,
    checker: LinkChecker,
    checker_enabled: bool,
}

impl Crawler {
    /// Builds the pipeline from a validated configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: Fetcher::new(&config.fetch, &config.user_agent)?,
            checker: LinkChecker::new(&config.checker, &config.user_agent)?,
            checker_enabled: config.checker.enabled,
        })
    }

    /// Crawls one target URL to completion, failure, or cancellation
    ///
    /// Always returns a well-formed [`CrawlResult`]; crawl-execution errors
    /// are folded into `CrawlResult::error` with every analysis field at its
    /// zero-value default.
    pub async fn crawl(&self, raw_url: &str, cancel: &CancellationToken) -> CrawlResult {
        let target = match normalize_target_url(raw_url) {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!("Rejected crawl target '{}': {}", raw_url.trim(), error);
                return CrawlResult::failed(raw_url.trim(), error.to_string());
            }
        };

        tracing::info!("Crawling {}", target);

        let page = match self.fetcher.fetch(&target, cancel).await {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!("Fetch of {} ended: {}", target, error);
                return CrawlResult::failed(target.as_str(), error.to_string());
            }
        };

        // A non-HTML body can only reach this point on a non-2xx response
        // (the fetcher rejects 2xx non-HTML), e.g. a bare redirect when
        // following is disabled. There is nothing to analyze; report the
        // observed status.
        if !is_html_content_type(&page.content_type) {
            return CrawlResult {
                url: target.to_string(),
                status_code: page.status_code,
                ..CrawlResult::default()
            };
        }

        let facts = analyze_html(&page.body);

        // Relative links resolve against the final URL so that a redirected
        // page classifies its links against the origin it actually lives on.
        let links = classify_links(&facts.links, &page.final_url);

        let broken_links = if self.checker_enabled {
            match self.checker.check(&links, cancel).await {
                Ok(broken) => broken,
                Err(error) => {
                    tracing::warn!("Link check of {} ended: {}", target, error);
                    return CrawlResult::failed(target.as_str(), error.to_string());
                }
            }
        } else {
            Vec::new()
        };

        tracing::info!(
            "Crawl of {} complete: {} internal, {} external, {} broken",
            target,
            links.internal.len(),
            links.external.len(),
            broken_links.len()
        );

        CrawlResult {
            url: target.to_string(),
            status_code: page.status_code,
            title: facts.title,
            html_version: facts.html_version,
            internal_links: links.internal.len(),
            external_links: links.external.len(),
            headings: facts.headings,
            meta_tags: facts.meta_tags,
            has_login_form: facts.has_login_form,
            broken_links,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_crawler_from_defaults() {
        let crawler = Crawler::new(&Config::default());
        assert!(crawler.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_yields_terminal_result() {
        let crawler = Crawler::new(&Config::default()).unwrap();
        let cancel = CancellationToken::new();

        let result = crawler.crawl("   ", &cancel).await;

        assert!(result.error.is_some());
        assert_eq!(result.status_code, 0);
        assert_eq!(result.internal_links, 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch_yields_cancelled_result() {
        let crawler = Crawler::new(&Config::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = crawler.crawl("https://example.com/", &cancel).await;

        assert!(result.is_cancelled());
        assert_eq!(result.error.as_deref(), Some("Crawl was cancelled"));
    }
}
