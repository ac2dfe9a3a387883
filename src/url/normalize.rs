use crate::CrawlError;
use url::Url;

/// Normalizes and validates a raw target URL string
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. Prepend `https://` when the string carries no scheme separator
/// 3. Parse; reject malformed input
/// 4. Reject schemes other than `http` and `https`
/// 5. Reject URLs without a host
/// 6. Strip any fragment component
///
/// The output is always an absolute, schemed, fragment-free URL. No network
/// access occurs here.
///
/// # Arguments
///
/// * `raw` - The raw URL string as supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Validated absolute URL
/// * `Err(CrawlError::InvalidUrl)` - The input cannot be crawled
///
/// # Examples
///
/// ```
/// use pagelens::url::normalize_target_url;
///
/// let url = normalize_target_url("example.com/a#frag").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a");
/// ```
pub fn normalize_target_url(raw: &str) -> Result<Url, CrawlError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(CrawlError::InvalidUrl("URL is empty".to_string()));
    }

    // Scheme-less inputs like "example.com/page" default to HTTPS. Inputs
    // that already carry a scheme separator are parsed as-is so that bad
    // schemes are rejected instead of silently rewritten.
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, |h| h.is_empty()) {
        return Err(CrawlError::InvalidUrl("URL has no host".to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_https_when_scheme_missing() {
        let url = normalize_target_url("example.com/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keeps_explicit_http_scheme() {
        let url = normalize_target_url("http://example.com/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_strips_fragment() {
        let url = normalize_target_url("https://example.com/a#frag").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_schemeless_input_with_fragment() {
        let url = normalize_target_url("example.com/a#frag").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_trims_whitespace() {
        let url = normalize_target_url("  https://example.com/  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let url = normalize_target_url("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_rejects_empty_input() {
        let result = normalize_target_url("   ");
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = normalize_target_url("ftp://example.com/file");
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_missing_host() {
        let result = normalize_target_url("https:///path");
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = normalize_target_url("http://");
        assert!(result.is_err());
    }

    #[test]
    fn test_preserves_query() {
        let url = normalize_target_url("example.com/search?q=rust#results").unwrap();
        assert_eq!(url.as_str(), "https://example.com/search?q=rust");
    }
}
