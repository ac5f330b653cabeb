use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*"([^"]+)""#).expect("valid anchor regex")
});

/// Strips the fragment from `url`.
pub fn clean(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Absolute, fragment-free http(s) links from the anchor tags of `html`, in
/// document order. Duplicates are kept; unparsable hrefs are skipped.
pub fn list_links(base: &Url, html: &str) -> Vec<Url> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|captures| base.join(captures[1].trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(clean)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn resolves_relative_links_and_drops_fragments() {
        let html = r#"
            <p><a href="guide.html#intro">Guide</a></p>
            <A class="x"
               HREF="/about">About</A>
            <a href="https://other.org/page?q=1#top">Other</a>
        "#;
        let links: Vec<String> = list_links(&base(), html).into_iter().map(String::from).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/docs/guide.html",
                "https://example.com/about",
                "https://other.org/page?q=1",
            ]
        );
    }

    #[test]
    fn skips_non_http_links_and_keeps_duplicates() {
        let html = r#"<a href="mailto:me@example.com">m</a>
                      <a href="page.html">1</a><a href="page.html#b">2</a>
                      <link href="style.css">"#;
        let links = list_links(&base(), html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
    }
}
