//! Link classification: internal/external partitioning and deduplication
//!
//! Takes the raw hrefs extracted by the analyzer and the page origin, and
//! produces the two deduplicated link sets the report counts and the
//! broken-link checker consumes.

use url::Url;

/// The classified, deduplicated links of one page
///
/// Both vectors preserve first-occurrence order. A link is internal when its
/// resolved host equals the origin host exactly; every other resolvable
/// http(s) link is external. The two sets are disjoint and their union is
/// exactly the set of distinct resolvable links on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLinks {
    pub internal: Vec<Url>,
    pub external: Vec<Url>,
}

impl ClassifiedLinks {
    /// Total number of distinct links across both sets
    pub fn total(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    /// Iterates internal links first, then external, each in
    /// first-occurrence order
    pub fn all(&self) -> impl Iterator<Item = &Url> {
        self.internal.iter().chain(self.external.iter())
    }
}

/// Resolves, filters, classifies, and deduplicates raw hrefs
///
/// Relative references are resolved against `origin`. Non-http(s) schemes
/// (`mailto:`, `javascript:`, `tel:`, `data:` all fall out of the scheme
/// check), unparseable hrefs, and fragment-only self-references are
/// discarded. Link identity for deduplication is the fully resolved
/// scheme+host+path+query string; fragments are stripped and ignored.
pub fn classify_links(hrefs: &[String], origin: &Url) -> ClassifiedLinks {
    let mut seen = std::collections::HashSet::new();
    let mut links = ClassifiedLinks::default();

    for href in hrefs {
        let Some(resolved) = resolve_href(href, origin) else {
            continue;
        };

        if !seen.insert(resolved.to_string()) {
            continue;
        }

        if resolved.host_str() == origin.host_str() {
            links.internal.push(resolved);
        } else {
            links.external.push(resolved);
        }
    }

    links
}

/// Resolves one href against the origin, returning None when the link
/// should be excluded from classification
fn resolve_href(href: &str, origin: &Url) -> Option<Url> {
    let href = href.trim();

    // Empty and fragment-only hrefs are same-page references
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut resolved = origin.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn hrefs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_internal_external_partition() {
        let links = classify_links(
            &hrefs(&["/about", "https://example.com/contact", "https://other.com/x"]),
            &origin(),
        );

        assert_eq!(links.internal.len(), 2);
        assert_eq!(links.external.len(), 1);
        assert_eq!(links.internal[0].as_str(), "https://example.com/about");
        assert_eq!(links.external[0].as_str(), "https://other.com/x");
    }

    #[test]
    fn test_relative_resolution() {
        let links = classify_links(&hrefs(&["sibling", "../up", "/rooted"]), &origin());

        let resolved: Vec<&str> = links.internal.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            resolved,
            vec![
                "https://example.com/sibling",
                "https://example.com/up",
                "https://example.com/rooted"
            ]
        );
        assert!(links.external.is_empty());
    }

    #[test]
    fn test_subdomain_is_external() {
        // Host comparison is exact: a subdomain is a different origin
        let links = classify_links(&hrefs(&["https://www.example.com/"]), &origin());

        assert!(links.internal.is_empty());
        assert_eq!(links.external.len(), 1);
    }

    #[test]
    fn test_non_http_schemes_discarded() {
        let links = classify_links(
            &hrefs(&[
                "mailto:x@example.com",
                "javascript:void(0)",
                "tel:+123456",
                "data:text/html,hi",
                "ftp://example.com/file",
            ]),
            &origin(),
        );

        assert_eq!(links.total(), 0);
    }

    #[test]
    fn test_fragment_only_discarded() {
        let links = classify_links(&hrefs(&["#section", "#", ""]), &origin());
        assert_eq!(links.total(), 0);
    }

    #[test]
    fn test_dedup_ignores_fragment() {
        let links = classify_links(
            &hrefs(&["/a#one", "/a#two", "/a", "https://example.com/a#three"]),
            &origin(),
        );

        assert_eq!(links.internal.len(), 1);
        assert_eq!(links.internal[0].as_str(), "https://example.com/a");
    }

    #[test]
    fn test_dedup_keeps_distinct_queries() {
        let links = classify_links(&hrefs(&["/a?p=1", "/a?p=2", "/a?p=1"]), &origin());
        assert_eq!(links.internal.len(), 2);
    }

    #[test]
    fn test_counts_invariant_and_disjoint_sets() {
        let raw = hrefs(&[
            "/a",
            "/b",
            "/a",
            "https://other.com/c",
            "https://example.com/b",
            "mailto:skip@example.com",
            "#skip",
        ]);
        let links = classify_links(&raw, &origin());

        // |internal| + |external| == |dedup(resolvable http(s) links)|
        assert_eq!(links.internal.len(), 2);
        assert_eq!(links.external.len(), 1);
        assert_eq!(links.total(), 3);

        let internal: std::collections::HashSet<&str> =
            links.internal.iter().map(|u| u.as_str()).collect();
        let external: std::collections::HashSet<&str> =
            links.external.iter().map(|u| u.as_str()).collect();
        assert!(internal.is_disjoint(&external));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let raw = hrefs(&["/a", "/b#frag", "https://other.com/c", "/a"]);

        let first = classify_links(&raw, &origin());
        let second = classify_links(&raw, &origin());

        assert_eq!(first, second);
    }

    #[test]
    fn test_first_occurrence_order_preserved() {
        let links = classify_links(&hrefs(&["/z", "/a", "/z", "/m"]), &origin());

        let order: Vec<&str> = links.internal.iter().map(|u| u.path()).collect();
        assert_eq!(order, vec!["/z", "/a", "/m"]);
    }
}
