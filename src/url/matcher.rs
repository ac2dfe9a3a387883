/// Checks if a host matches a deny-list pattern
///
/// Patterns are bare domains; a pattern matches the domain itself and any of
/// its subdomains, so a deny-list entry of "facebook.com" also covers
/// "www.facebook.com". An explicit "*." prefix is accepted and means the
/// same thing. Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use pagelens::url::host_matches;
///
/// assert!(host_matches("facebook.com", "facebook.com"));
/// assert!(host_matches("facebook.com", "www.facebook.com"));
/// assert!(host_matches("*.twitter.com", "api.twitter.com"));
/// assert!(!host_matches("facebook.com", "notfacebook.com"));
/// ```
pub fn host_matches(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    let base = pattern.strip_prefix("*.").unwrap_or(&pattern);
    if base.is_empty() {
        return false;
    }

    host == base || host.ends_with(&format!(".{}", base))
}
