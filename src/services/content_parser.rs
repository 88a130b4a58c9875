use std::sync::LazyLock;

use regex::Regex;

use crate::models::content::{ContentBlock, InlineRun};
use crate::services::html_entities::decode_html_entities;

// ==============================================================================
// Content Block Parser
// ==============================================================================
//
// Turns a raw WordPress `content.rendered` body into an ordered list of
// renderable blocks. Four independent matchers scan the cleaned HTML and
// record spans over the original offsets; a single sort by start offset
// restores document order. Malformed fragments are dropped, never raised.

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style>").unwrap());

static HEADING_RES: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let level = i + 1;
        Regex::new(&format!(r"(?is)<h{level}[^>]*>(.*?)</h{level}>")).unwrap()
    })
});
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*/?>"#).unwrap());
static TWEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<blockquote[^>]*class=["'][^"']*twitter-tweet[^"']*["'][^>]*>(.*?)</blockquote>"#)
        .unwrap()
});

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a[^>]+href=["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img[^>]*>").unwrap());

static TWEET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=["']([^"']*(?:twitter\.com|x\.com)[^"']*)["']"#).unwrap()
});
static TWEET_AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"—\s*([^(<]+)").unwrap());

/// One matched element, positioned by its start offset in the cleaned HTML.
enum ElementSpan<'a> {
    Heading { start: usize, level: u8, inner: &'a str },
    Paragraph { start: usize, inner: &'a str },
    Image { start: usize, url: String },
    Tweet { start: usize, text: String, url: String, author: String },
}

impl ElementSpan<'_> {
    fn start(&self) -> usize {
        match self {
            ElementSpan::Heading { start, .. }
            | ElementSpan::Paragraph { start, .. }
            | ElementSpan::Image { start, .. }
            | ElementSpan::Tweet { start, .. } => *start,
        }
    }
}

/// Parse an article body into ordered content blocks. Pure and
/// deterministic: the same input always yields the same output.
pub fn parse_html_content(html: &str) -> Vec<ContentBlock> {
    if html.is_empty() {
        return Vec::new();
    }

    // Script and style bodies must never reach the renderer.
    let cleaned = SCRIPT_RE.replace_all(html, "");
    let cleaned = STYLE_RE.replace_all(&cleaned, "");

    let mut spans: Vec<ElementSpan> = Vec::new();

    for (index, heading_re) in HEADING_RES.iter().enumerate() {
        for caps in heading_re.captures_iter(&cleaned) {
            let whole = caps.get(0).unwrap();
            spans.push(ElementSpan::Heading {
                start: whole.start(),
                level: (index + 1) as u8,
                inner: caps.get(1).unwrap().as_str(),
            });
        }
    }

    for caps in PARAGRAPH_RE.captures_iter(&cleaned) {
        let whole = caps.get(0).unwrap();
        spans.push(ElementSpan::Paragraph {
            start: whole.start(),
            inner: caps.get(1).unwrap().as_str(),
        });
    }

    for caps in IMAGE_RE.captures_iter(&cleaned) {
        let whole = caps.get(0).unwrap();
        spans.push(ElementSpan::Image {
            start: whole.start(),
            url: caps[1].to_string(),
        });
    }

    for caps in TWEET_RE.captures_iter(&cleaned) {
        let whole = caps.get(0).unwrap();
        if let Some((text, url, author)) = parse_tweet(caps.get(1).unwrap().as_str()) {
            spans.push(ElementSpan::Tweet {
                start: whole.start(),
                text,
                url,
                author,
            });
        }
    }

    // The matchers ran independently; this one sort is what restores the
    // original document order across element types.
    spans.sort_by_key(|span| span.start());

    let mut blocks = Vec::new();
    for span in spans {
        match span {
            ElementSpan::Heading { level, inner, .. } => {
                let parts = parse_inline_content(inner);
                if !parts.is_empty() {
                    blocks.push(ContentBlock::Heading { level, parts });
                }
            }
            ElementSpan::Paragraph { inner, .. } => {
                let parts = parse_inline_content(inner);
                if !parts.is_empty() {
                    blocks.push(ContentBlock::Paragraph { parts });
                }
            }
            ElementSpan::Image { url, .. } => blocks.push(ContentBlock::Image { url }),
            ElementSpan::Tweet {
                text, url, author, ..
            } => blocks.push(ContentBlock::Tweet { text, url, author }),
        }
    }

    blocks
}

/// Parse the inner HTML of a heading or paragraph into text and link runs.
pub fn parse_inline_content(html: &str) -> Vec<InlineRun> {
    let mut parts = Vec::new();
    let mut last_index = 0;

    for caps in ANCHOR_RE.captures_iter(html) {
        let whole = caps.get(0).unwrap();

        if whole.start() > last_index {
            push_text_run(&html[last_index..whole.start()], &mut parts);
        }
        last_index = whole.end();

        let url = caps.get(1).unwrap().as_str();
        let inner = caps.get(2).unwrap().as_str();

        // An href with a tag inside it is mangled markup; nothing usable.
        if TAG_RE.is_match(url) {
            continue;
        }

        // Image-wrapped links belong to the image matcher, not the text flow.
        if IMG_TAG_RE.is_match(inner) {
            continue;
        }

        let text = decode_html_entities(&TAG_RE.replace_all(inner, ""));
        if !text.trim().is_empty() && text.trim() != "&nbsp;" {
            parts.push(InlineRun::Link {
                url: url.to_string(),
                text,
            });
        }
    }

    if last_index < html.len() {
        push_text_run(&html[last_index..], &mut parts);
    }

    parts
}

fn push_text_run(raw: &str, parts: &mut Vec<InlineRun>) {
    let text = decode_html_entities(&TAG_RE.replace_all(raw, ""));
    if !text.trim().is_empty() && text.trim() != "&nbsp;" {
        // Leading/trailing whitespace is kept so runs rejoin cleanly around
        // links.
        parts.push(InlineRun::Text { content: text });
    }
}

/// Extract tweet body, canonical URL and author from a twitter-tweet
/// blockquote. Candidates missing either body text or URL are dropped.
fn parse_tweet(inner: &str) -> Option<(String, String, String)> {
    let mut paragraphs = Vec::new();
    for caps in PARAGRAPH_RE.captures_iter(inner) {
        let text = decode_html_entities(&TAG_RE.replace_all(&caps[1], ""));
        let text = text.trim();
        if !text.is_empty() && text != "&nbsp;" {
            paragraphs.push(text.to_string());
        }
    }
    let text = paragraphs.join("\n\n");

    let url = TWEET_URL_RE
        .captures(inner)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let author = TWEET_AUTHOR_RE
        .captures(inner)
        .map(|caps| caps[1].trim().trim_start_matches('@').to_string())
        .unwrap_or_default();

    if text.is_empty() || url.is_empty() {
        return None;
    }

    Some((text, url, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_follow_document_order() {
        let html = r#"<h2>Market Recap</h2><p>Prices moved.</p><img src="https://img.example/chart.png"/><p>More detail.</p><h3>Outlook</h3>"#;
        let blocks = parse_html_content(html);

        assert_eq!(blocks.len(), 5);
        assert!(matches!(blocks[0], ContentBlock::Heading { level: 2, .. }));
        assert!(matches!(blocks[1], ContentBlock::Paragraph { .. }));
        assert!(
            matches!(blocks[2], ContentBlock::Image { ref url } if url == "https://img.example/chart.png")
        );
        assert!(matches!(blocks[3], ContentBlock::Paragraph { .. }));
        assert!(matches!(blocks[4], ContentBlock::Heading { level: 3, .. }));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let html = r#"<h1>Title</h1><p>Body with <a href="https://example.com">a link</a>.</p><img src="x.png">"#;
        assert_eq!(parse_html_content(html), parse_html_content(html));
    }

    #[test]
    fn test_inline_link_extraction() {
        let runs = parse_inline_content(r#"A <a href='http://x'>B</a> C"#);
        assert_eq!(
            runs,
            vec![
                InlineRun::text("A "),
                InlineRun::link("http://x", "B"),
                InlineRun::text(" C"),
            ]
        );
    }

    #[test]
    fn test_image_wrapped_link_is_suppressed() {
        let blocks =
            parse_html_content(r#"<p><a href='https://u'><img src='https://i.png'/></a></p>"#);

        // No link run survives; the image matcher still reports the image.
        assert!(blocks.iter().all(|b| match b {
            ContentBlock::Paragraph { parts } | ContentBlock::Heading { parts, .. } => parts
                .iter()
                .all(|r| !matches!(r, InlineRun::Link { .. })),
            _ => true,
        }));
        assert!(blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::Image { url } if url == "https://i.png")));
    }

    #[test]
    fn test_malformed_href_is_skipped() {
        let runs = parse_inline_content(r#"See <a href="https://x<span>y">broken</a> here"#);
        assert!(runs
            .iter()
            .all(|r| !matches!(r, InlineRun::Link { .. })));
    }

    #[test]
    fn test_whitespace_only_paragraph_is_dropped() {
        let blocks = parse_html_content("<p>&nbsp;</p><p>   </p><p>Real text</p>");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], ContentBlock::Paragraph { .. }));
    }

    #[test]
    fn test_script_and_style_are_stripped() {
        let html = r#"<script>alert("x")</script><p>Visible</p><style>p { color: red }</style>"#;
        let blocks = parse_html_content(html);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], ContentBlock::Paragraph { .. }));
    }

    #[test]
    fn test_entities_decode_in_text_runs() {
        let runs = parse_inline_content("Fear &amp; Greed &ndash; 72");
        assert_eq!(runs, vec![InlineRun::text("Fear & Greed \u{2013} 72")]);
    }

    #[test]
    fn test_tweet_extraction() {
        let html = r#"<blockquote class="twitter-tweet" data-theme="dark"><p>BTC just broke $100k.</p><p>Wild day.</p>— Jane Trader (@janetrader) <a href="https://twitter.com/janetrader/status/123">March 5, 2024</a></blockquote>"#;
        let blocks = parse_html_content(html);

        let tweet = blocks
            .iter()
            .find_map(|b| match b {
                ContentBlock::Tweet { text, url, author } => Some((text, url, author)),
                _ => None,
            })
            .expect("tweet block");

        assert_eq!(tweet.0, "BTC just broke $100k.\n\nWild day.");
        assert_eq!(tweet.1, "https://twitter.com/janetrader/status/123");
        assert_eq!(tweet.2, "Jane Trader");
    }

    #[test]
    fn test_tweet_author_handle_loses_at_sign() {
        let html = r#"<blockquote class="twitter-tweet"><p>gm</p>— @degen <a href="https://x.com/degen/status/9">link</a></blockquote>"#;
        let blocks = parse_html_content(html);

        assert!(blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::Tweet { author, .. } if author == "degen")));
    }

    #[test]
    fn test_tweet_without_url_is_dropped() {
        let html = r#"<blockquote class="twitter-tweet"><p>No link here.</p></blockquote>"#;
        let blocks = parse_html_content(html);
        assert!(blocks
            .iter()
            .all(|b| !matches!(b, ContentBlock::Tweet { .. })));
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(parse_html_content("").is_empty());
    }
}
