use once_cell::sync::Lazy;
use regex::Regex;

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

// The regex crate has no backreferences, so each block element gets its own
// alternative.
static BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<head\b.*?</head\s*>|<style\b.*?</style\s*>|<script\b.*?</script\s*>|<noscript\b.*?</noscript\s*>|<svg\b.*?</svg\s*>",
    )
    .expect("valid block regex")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

static ENTITIES: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[^\s;]+;").expect("valid entity regex"));

/// Plain text of an HTML page: comments, non-content blocks (head, style,
/// script, noscript, svg) and tags are removed and entities become spaces.
pub fn strip_markup(html: &str) -> String {
    let text = COMMENTS.replace_all(html, " ");
    let text = BLOCKS.replace_all(&text, " ");
    let text = TAGS.replace_all(&text, " ");
    ENTITIES.replace_all(&text, " ").into_owned()
}
