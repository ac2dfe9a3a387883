//! Pagelens: a single-page web crawl-and-analyze engine
//!
//! Given a target URL, pagelens fetches the page under a cancellable,
//! retrying HTTP policy, extracts structural signals from the HTML (title,
//! HTML version, headings, meta tags, login-form presence), classifies every
//! hyperlink as internal or external relative to the page origin, and probes
//! a filtered subset of those links for liveness. The outcome of a crawl is
//! an immutable [`report::CrawlResult`] delivered through an exactly-once
//! completion callback owned by the [`jobs::JobManager`].

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod report;
pub mod url;

use thiserror::Error;

/// Errors that can terminate a running crawl
///
/// Everything here is recovered below the job-manager boundary: a crawl task
/// never raises these across the completion callback, it folds them into
/// `CrawlResult::error` instead. The `Display` strings are therefore the
/// exact text the owning service sees.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The raw input could not be turned into a usable http(s) URL.
    /// Never retried; fails before any network call.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, DNS, timeout, or body-read failure during fetch.
    /// Retried up to the configured attempt limit.
    #[error("Request failed for {url}: {detail}")]
    Transport { url: String, detail: String },

    /// The redirect chain exceeded the configured maximum. Terminal.
    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },

    /// The target responded successfully but the body is not HTML. Terminal;
    /// distinguishes "fetched but unanalyzable" from a network fault.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The job's cancellation token fired. Terminal. The owning service
    /// relies on this exact message to tell a deliberate stop from a failure.
    #[error("Crawl was cancelled")]
    Cancelled,
}

/// Synchronous, caller-facing errors from the job manager
///
/// Distinct from [`CrawlError`]: these never appear inside a `CrawlResult`
/// and are returned directly to the caller of `start`/`stop`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("A crawl is already running for job {0}")]
    AlreadyRunning(u64),

    #[error("No running crawl for job {0}")]
    NotRunning(u64),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl-execution operations
pub type CrawlOutcome<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use jobs::{JobId, JobManager};
pub use report::{BrokenLinkInfo, CrawlResult, HeadingCounts};
pub use url::normalize_target_url;
