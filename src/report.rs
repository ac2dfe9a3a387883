//! Crawl result data model
//!
//! A [`CrawlResult`] is the immutable output record of one crawl job. It is
//! constructed once by the pipeline and handed to the completion callback by
//! ownership transfer; nothing mutates it afterwards.

use crate::CrawlError;
use serde::Serialize;
use std::collections::HashMap;

/// Heading occurrence counts per level (h1 through h6)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Increments the count for the given heading level (1-6).
    /// Levels outside that range are ignored.
    pub fn record(&mut self, level: u8) {
        match level {
            1 => self.h1 += 1,
            2 => self.h2 += 1,
            3 => self.h3 += 1,
            4 => self.h4 += 1,
            5 => self.h5 += 1,
            6 => self.h6 += 1,
            _ => {}
        }
    }

    /// Total number of headings across all levels
    pub fn total(&self) -> u32 {
        self.h1 + self.h2 + self.h3 + self.h4 + self.h5 + self.h6
    }
}

/// A link that failed its liveness probe
///
/// Produced only by the broken-link checker. `status_code` is 0 when the
/// request itself failed (connection, DNS, timeout) rather than returning an
/// error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkInfo {
    pub url: String,
    pub status_code: u16,
    pub detail: String,
}

/// The immutable output record of one completed (or failed/cancelled) crawl
///
/// Invariant: when `error` is non-empty the crawl never produced analysis
/// output, and every field other than `url` holds its zero-value default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlResult {
    /// The normalized target URL (or the raw input when validation failed)
    pub url: String,

    /// HTTP status code of the page fetch (0 if the fetch never completed)
    pub status_code: u16,

    /// Text of the first `<title>` element, empty if absent
    pub title: String,

    /// HTML version inferred from the doctype ("HTML5", "HTML 4.01", ...)
    pub html_version: String,

    /// Number of unique links resolving to the page's own host
    pub internal_links: usize,

    /// Number of unique links resolving to any other host
    pub external_links: usize,

    /// Heading counts per level
    pub headings: HeadingCounts,

    /// Meta tag mapping (`name`/`property` attribute to `content`),
    /// first occurrence wins on duplicate keys
    pub meta_tags: HashMap<String, String>,

    /// Whether the page contains a form with a password input
    pub has_login_form: bool,

    /// Links that failed their liveness probe, in classification order
    pub broken_links: Vec<BrokenLinkInfo>,

    /// Terminal crawl-execution error, if the crawl did not complete
    pub error: Option<String>,
}

impl CrawlResult {
    /// Builds the terminal-error form of a result: the target URL and the
    /// error message, with every analysis field at its zero-value default.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// True when the crawl ended because of a deliberate `stop`, as opposed
    /// to a validation or network failure.
    pub fn is_cancelled(&self) -> bool {
        self.error.as_deref() == Some(CrawlError::Cancelled.to_string().as_str())
    }
}
