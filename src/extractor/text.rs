use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static SCRIPT_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style|noscript)\b[^>]*>.*?</(?:script|style|noscript)\s*>")
        .expect("script pattern is valid")
});

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*>").expect("tag pattern is valid"));

/// Flatten an HTML page into its text content.
///
/// Tags are dropped without inserting separators, so adjacent cells run
/// together the way a DOM text dump does. Plain text passes through.
pub fn page_text(raw: &str) -> String {
    let without_comments = COMMENTS.replace_all(raw, "");
    let without_scripts = SCRIPT_BLOCKS.replace_all(&without_comments, "");
    let without_tags = TAGS.replace_all(&without_scripts, "");
    decode_html_entities(&without_tags).into_owned()
}
