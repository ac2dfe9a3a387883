//! Broken-link checker
//!
//! Probes the classified links of a page for liveness with a bounded worker
//! pool. Probes are HEAD requests (cheap, no body) falling back to GET when
//! the target rejects HEAD. A response with status >= 400, or any transport
//! failure, is recorded as broken; 2xx/3xx responses are not recorded.
//!
//! Hosts on the configured deny-list are excluded before probing: checking
//! very-high-traffic third-party platforms is unreliable and uninformative,
//! so their exclusion is deliberate policy.

use crate::config::{CheckerConfig, UserAgentConfig};
use crate::crawler::links::ClassifiedLinks;
use crate::report::BrokenLinkInfo;
use crate::url::host_matches;
use crate::CrawlError;
use futures::stream::{self, StreamExt};
use reqwest::{redirect::Policy, Client, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Probes classified links for liveness under a concurrency bound
pub struct LinkChecker {
    client: Client,
    config: CheckerConfig,
}

impl LinkChecker {
    /// Builds a checker with its own short-timeout HTTP client
    pub fn new(
        config: &CheckerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(config.request_timeout())
            .redirect(Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Checks every non-deny-listed link and returns the broken ones
    ///
    /// Probes run through an ordered bounded stream (`buffered`), so at most
    /// `max_concurrent` checks are in flight at once and the returned
    /// sequence follows classification order deterministically. Each probe
    /// selects against the cancellation token; when the token fires the
    /// whole check aborts promptly with [`CrawlError::Cancelled`].
    pub async fn check(
        &self,
        links: &ClassifiedLinks,
        cancel: &CancellationToken,
    ) -> Result<Vec<BrokenLinkInfo>, CrawlError> {
        // Owned URLs: the probe futures must not borrow from the stream's
        // items, or the crawl future stops being spawnable.
        let candidates: Vec<Url> = links
            .all()
            .filter(|url| !self.should_skip(url))
            .cloned()
            .collect();

        tracing::debug!(
            "Checking {} of {} classified links",
            candidates.len(),
            links.total()
        );

        let outcomes: Vec<Option<BrokenLinkInfo>> = stream::iter(candidates)
            .map(|url| async move { self.probe(&url, cancel).await })
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        if cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        Ok(outcomes.into_iter().flatten().collect())
    }

    /// Deny-list filter; links without a host cannot be probed either
    fn should_skip(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self
                .config
                .skip_hosts
                .iter()
                .any(|pattern| host_matches(pattern, host)),
            None => true,
        }
    }

    /// Probes one link, racing the cancellation token
    async fn probe(&self, url: &Url, cancel: &CancellationToken) -> Option<BrokenLinkInfo> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            outcome = self.probe_link(url) => outcome,
        }
    }

    /// HEAD request with GET fallback when the method is rejected
    async fn probe_link(&self, url: &Url) -> Option<BrokenLinkInfo> {
        match self.client.head(url.clone()).send().await {
            Ok(response) if head_not_supported(response.status()) => {
                match self.client.get(url.clone()).send().await {
                    Ok(response) => record_status(url, response.status()),
                    Err(error) => Some(record_failure(url, &error)),
                }
            }
            Ok(response) => record_status(url, response.status()),
            Err(error) => Some(record_failure(url, &error)),
        }
    }
}

/// Status codes that mean "HEAD rejected, try GET" rather than "broken"
fn head_not_supported(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

/// Records a response status; 2xx/3xx links are alive and not recorded
fn record_status(url: &Url, status: StatusCode) -> Option<BrokenLinkInfo> {
    if status.as_u16() >= 400 {
        Some(BrokenLinkInfo {
            url: url.to_string(),
            status_code: status.as_u16(),
            detail: format!("HTTP {}", status.as_u16()),
        })
    } else {
        None
    }
}

/// Records a transport failure with status code 0
fn record_failure(url: &Url, error: &reqwest::Error) -> BrokenLinkInfo {
    let detail = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else {
        error.to_string()
    };

    BrokenLinkInfo {
        url: url.to_string(),
        status_code: 0,
        detail,
    }
}
