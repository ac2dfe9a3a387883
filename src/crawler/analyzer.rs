//! HTML analyzer for extracting structural page signals
//!
//! Parses fetched HTML into the facts the crawl report is built from:
//! - Page title
//! - HTML version inferred from the doctype
//! - Heading counts per level (h1-h6)
//! - Meta tag mapping
//! - Login-form presence
//! - Raw ordered anchor hrefs (classified later)
//!
//! Parsing is tolerant: real-world pages are frequently malformed, so this
//! is a best-effort extraction with no hard failure path.

use crate::report::HeadingCounts;
use scraper::{Html, Node, Selector};
use std::collections::HashMap;

/// Structural facts extracted from one HTML document
#[derive(Debug, Clone, Default)]
pub struct PageFacts {
    /// Text of the first `<title>` element, trimmed, empty if absent
    pub title: String,

    /// HTML version label inferred from the doctype
    pub html_version: String,

    /// Heading counts per level
    pub headings: HeadingCounts,

    /// `name`/`property` attribute to `content`; first occurrence wins
    pub meta_tags: HashMap<String, String>,

    /// Whether any `<form>` contains a password-type input
    pub has_login_form: bool,

    /// Raw `href` values of anchor tags in document order, unclassified
    pub links: Vec<String>,
}

/// Analyzes an HTML document into [`PageFacts`]
///
/// # Example
///
/// ```
/// use pagelens::crawler::analyze_html;
///
/// let html = r#"<!DOCTYPE html>
/// <html><head><title>Home</title></head>
/// <body><h1>Hi</h1><a href="/about">About</a></body></html>"#;
///
/// let facts = analyze_html(html);
/// assert_eq!(facts.title, "Home");
/// assert_eq!(facts.html_version, "HTML5");
/// assert_eq!(facts.headings.h1, 1);
/// assert_eq!(facts.links, vec!["/about"]);
/// ```
pub fn analyze_html(html: &str) -> PageFacts {
    let document = Html::parse_document(html);

    PageFacts {
        title: extract_title(&document),
        html_version: detect_html_version(&document),
        headings: count_headings(&document),
        meta_tags: extract_meta_tags(&document),
        has_login_form: detect_login_form(&document),
        links: extract_raw_links(&document),
    }
}

/// Extracts the first `<title>` element's text, empty if absent
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Infers the HTML version from the document's doctype node
///
/// The bare `<!DOCTYPE html>` shorthand identifies HTML5. Legacy doctypes
/// carry a public identifier naming the DTD; those are mapped to best-effort
/// labels. Documents without a recognizable doctype report "Unknown".
fn detect_html_version(document: &Html) -> String {
    for node in document.tree.nodes() {
        let Node::Doctype(doctype) = node.value() else {
            continue;
        };

        if !doctype.name().eq_ignore_ascii_case("html") {
            return "Unknown".to_string();
        }

        let public_id = doctype.public_id();
        if public_id.is_empty() {
            return "HTML5".to_string();
        }

        return version_from_public_id(public_id);
    }

    "Unknown".to_string()
}

/// Maps a legacy doctype public identifier to a version label
fn version_from_public_id(public_id: &str) -> String {
    const KNOWN_VERSIONS: &[(&str, &str)] = &[
        ("XHTML 1.1", "XHTML 1.1"),
        ("XHTML 1.0", "XHTML 1.0"),
        ("XHTML Basic", "XHTML Basic"),
        ("HTML 4.01", "HTML 4.01"),
        ("HTML 4.0", "HTML 4.0"),
        ("HTML 3.2", "HTML 3.2"),
        ("HTML 2.0", "HTML 2.0"),
    ];

    for (marker, label) in KNOWN_VERSIONS {
        if public_id.contains(marker) {
            return label.to_string();
        }
    }

    "Unknown".to_string()
}

/// Counts heading elements per level
fn count_headings(document: &Html) -> HeadingCounts {
    let mut counts = HeadingCounts::default();

    for level in 1..=6u8 {
        if let Ok(selector) = Selector::parse(&format!("h{}", level)) {
            for _ in document.select(&selector) {
                counts.record(level);
            }
        }
    }

    counts
}

/// Extracts the meta-tag mapping
///
/// The key is the `name` attribute, falling back to `property` (Open Graph
/// style tags). Entries without a key or a `content` attribute are skipped.
/// The first occurrence of a key wins.
fn extract_meta_tags(document: &Html) -> HashMap<String, String> {
    let mut meta_tags = HashMap::new();

    let Ok(selector) = Selector::parse("meta") else {
        return meta_tags;
    };

    for element in document.select(&selector) {
        let attrs = element.value();
        let Some(key) = attrs.attr("name").or_else(|| attrs.attr("property")) else {
            continue;
        };
        let Some(content) = attrs.attr("content") else {
            continue;
        };

        meta_tags
            .entry(key.to_string())
            .or_insert_with(|| content.to_string());
    }

    meta_tags
}

/// Login-form heuristic: any `<form>` containing a password-type input
fn detect_login_form(document: &Html) -> bool {
    let (Ok(form_selector), Ok(password_selector)) = (
        Selector::parse("form"),
        Selector::parse(r#"input[type="password"]"#),
    ) else {
        return false;
    };

    document
        .select(&form_selector)
        .any(|form| form.select(&password_selector).next().is_some())
}

/// Collects raw anchor hrefs in document order, without resolving or
/// filtering them; that is the link classifier's job
fn extract_raw_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
