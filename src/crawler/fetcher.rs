//! HTTP fetcher for the target page
//!
//! This module handles the page fetch for a crawl, including:
//! - Building an HTTP client with a descriptive user agent
//! - Timeout and redirect policy enforcement
//! - Retry logic for transport-level failures
//! - Cooperative cancellation at every suspension point
//! - The content-type gate that keeps non-HTML responses out of the analyzer

use crate::config::{FetchConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::{redirect::Policy, Client, Response};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A successfully fetched page
///
/// "Successfully" means the HTTP exchange completed; the status code may
/// still be non-2xx, which the pipeline interprets.
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after any followed redirects
    pub final_url: Url,

    /// HTTP status code of the last response
    pub status_code: u16,

    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// Response body
    pub body: String,
}

/// Returns true when a Content-Type header value indicates an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Fetches target pages under a configured timeout/redirect/retry policy
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Builds a fetcher with its HTTP client configured from the policy
    ///
    /// Redirects are handled by the client: `Policy::limited` when following
    /// is enabled (exceeding the limit surfaces as
    /// [`CrawlError::TooManyRedirects`]), `Policy::none` otherwise, in which
    /// case the first redirect response is returned as-is.
    pub fn new(config: &FetchConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        // reqwest's limit counts visited URLs including the original
        // request, so allowing `max_redirects` follows needs limit + 1.
        let redirect_policy = if config.follow_redirects {
            Policy::limited(config.max_redirects as usize + 1)
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(config.request_timeout())
            .redirect(redirect_policy)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fetches a validated target URL
    ///
    /// # Retry Logic
    ///
    /// Transport-level failures (connect, DNS, timeout, body read) are
    /// retried up to `max_retries` extra attempts with `retry_delay` between
    /// them. Everything else is terminal on the first occurrence:
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | Transport failure, attempts left | wait `retry_delay`, retry |
    /// | Transport failure, attempts exhausted | `Transport` |
    /// | Redirect limit exceeded | `TooManyRedirects` |
    /// | 2xx response without an HTML content type | `UnsupportedContentType` |
    /// | Any other completed response | `Ok(FetchedPage)`, status as-is |
    ///
    /// The cancellation token is checked before every attempt and selected
    /// against during the in-flight request, the body read, and the retry
    /// sleep, so a `stop` terminates the fetch within at most one retry
    /// delay or one request timeout.
    pub async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, CrawlError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }

            let error = match self.attempt_fetch(url, cancel).await {
                Ok(page) => return Ok(page),
                Err(e) => e,
            };

            match error {
                CrawlError::Transport { url: u, detail } if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Fetch attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt,
                        self.config.max_retries + 1,
                        u,
                        detail,
                        self.config.retry_delay()
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
                        _ = tokio::time::sleep(self.config.retry_delay()) => {}
                    }
                }
                terminal => return Err(terminal),
            }
        }
    }

    /// Performs one GET attempt, including the content-type gate
    async fn attempt_fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, CrawlError> {
        let response: Response = tokio::select! {
            _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
            result = self.client.get(url.clone()).send() => {
                result.map_err(|e| classify_send_error(url, &e))?
            }
        };

        let status_code = response.status().as_u16();
        let is_success = response.status().is_success();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // The body is consumed on every path, including the unsupported
        // content-type one, so the connection is always released cleanly.
        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
            result = response.text() => {
                result.map_err(|e| CrawlError::Transport {
                    url: url.to_string(),
                    detail: format!("failed to read body: {}", e),
                })?
            }
        };

        if is_success && !is_html_content_type(&content_type) {
            return Err(CrawlError::UnsupportedContentType(if content_type.is_empty() {
                "(none)".to_string()
            } else {
                content_type
            }));
        }

        Ok(FetchedPage {
            final_url,
            status_code,
            content_type,
            body,
        })
    }
}

/// Classifies a reqwest send error into the crawl error taxonomy
fn classify_send_error(url: &Url, error: &reqwest::Error) -> CrawlError {
    if error.is_redirect() {
        CrawlError::TooManyRedirects {
            url: url.to_string(),
        }
    } else if error.is_timeout() {
        CrawlError::Transport {
            url: url.to_string(),
            detail: "request timed out".to_string(),
        }
    } else if error.is_connect() {
        CrawlError::Transport {
            url: url.to_string(),
            detail: format!("connection failed: {}", error),
        }
    } else {
        CrawlError::Transport {
            url: url.to_string(),
            detail: error.to_string(),
        }
    }
}
