use serde::Deserialize;
use std::time::Duration;

/// Hosts excluded from broken-link checking by default
///
/// Probing very-high-traffic social/ad/analytics platforms is unreliable
/// (aggressive bot detection, geo-dependent responses) and not informative
/// for a broken-link report. This filter is deliberate policy, not a bug;
/// it can be overridden per-config via `checker.skip-hosts`.
const DEFAULT_SKIP_HOSTS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "google.com",
    "doubleclick.net",
    "googletagmanager.com",
    "t.co",
];

/// Main configuration structure for pagelens
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub fetch: FetchConfig,
    pub checker: CheckerConfig,
    pub user_agent: UserAgentConfig,
}

/// Page-fetch policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Overall timeout for one fetch attempt (seconds)
    pub request_timeout_secs: u64,

    /// Whether to follow redirects at all. When false, the first redirect
    /// response is returned as-is rather than followed.
    pub follow_redirects: bool,

    /// Maximum redirects to follow before failing the fetch
    pub max_redirects: u32,

    /// Maximum retry attempts after a transport failure (0 = no retries)
    pub max_retries: u32,

    /// Delay between retry attempts (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            follow_redirects: true,
            max_redirects: 10,
            max_retries: 2,
            retry_delay_ms: 1000,
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Broken-link checker policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckerConfig {
    /// Whether to probe classified links at all. When false, every report
    /// carries an empty broken-link list.
    pub enabled: bool,

    /// Timeout for one liveness probe (seconds)
    pub request_timeout_secs: u64,

    /// Maximum simultaneous in-flight probes
    pub max_concurrent: usize,

    /// Hosts to exclude from checking (each entry also covers subdomains)
    pub skip_hosts: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_timeout_secs: 5,
            max_concurrent: 10,
            skip_hosts: DEFAULT_SKIP_HOSTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CheckerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Client identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the analyzer client
    pub name: String,

    /// Version advertised in the User-Agent header
    pub version: String,

    /// Optional URL with information about the client
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "pagelens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the descriptive User-Agent header value.
    /// Format: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_usable() {
        let config = Config::default();

        assert!(config.fetch.follow_redirects);
        assert!(config.fetch.max_retries > 0);
        assert!(config.checker.enabled);
        assert!(config.checker.max_concurrent >= 1);
        assert!(!config.checker.skip_hosts.is_empty());
    }

    #[test]
    fn test_duration_helpers() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.request_timeout(), Duration::from_secs(10));
        assert_eq!(fetch.retry_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            name: "TestLens".to_string(),
            version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "TestLens/1.0");

        let ua = UserAgentConfig {
            contact_url: Some("https://example.com/about".to_string()),
            ..ua
        };
        assert_eq!(ua.header_value(), "TestLens/1.0 (+https://example.com/about)");
    }
}
