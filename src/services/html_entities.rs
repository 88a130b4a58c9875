use std::sync::LazyLock;

use regex::{Captures, Regex};

static DECIMAL_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").unwrap());
static HEX_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#[xX]([0-9a-fA-F]+);").unwrap());

/// Named entities the content source actually emits, in replacement order.
/// Each entry is applied once over the whole string, so double-encoded
/// sequences like `&amp;amp;` decode exactly one level.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&sbquo;", "\u{201A}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&bdquo;", "\u{201E}"),
    ("&hellip;", "\u{2026}"),
    ("&trade;", "\u{2122}"),
    ("&copy;", "\u{00A9}"),
    ("&reg;", "\u{00AE}"),
    ("&euro;", "\u{20AC}"),
    ("&pound;", "\u{00A3}"),
    ("&yen;", "\u{00A5}"),
];

fn decode_numeric(caps: &Captures, radix: u32) -> String {
    let raw = &caps[1];
    u32::from_str_radix(raw, radix)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        // Out-of-range references are left as-is rather than dropped.
        .unwrap_or_else(|| caps[0].to_string())
}

/// Decode numeric (`&#169;`, `&#x2014;`) and the fixed table of named HTML
/// entities. Must run after tag-stripping so attribute values never decode
/// into visible text.
pub fn decode_html_entities(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = DECIMAL_ENTITY_RE.replace_all(text, |caps: &Captures| decode_numeric(caps, 10));
    let decoded = HEX_ENTITY_RE.replace_all(&decoded, |caps: &Captures| decode_numeric(caps, 16));

    let mut decoded = decoded.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }

    decoded
}
