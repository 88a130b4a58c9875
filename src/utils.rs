use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Host of the content site; links into it open in-app instead of the
/// browser.
pub const CONTENT_SITE_HOST: &str = "cryptopotato.com";

static ARTICLE_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cryptopotato\.com/([^/]+)/?$").unwrap());

// ==============================================================================
// Formatting Helpers
// ==============================================================================

/// Format a USD price with precision tiers: two decimals with thousands
/// separators from $1 up, then 4/6/8 decimals as the price shrinks.
pub fn format_price(price: f64) -> String {
    if !(price > 0.0) || !price.is_finite() {
        return "$0.00".to_string();
    }

    if price >= 1.0 {
        format!("${}", group_thousands(&format!("{:.2}", price)))
    } else if price >= 0.01 {
        format!("${:.4}", price)
    } else if price >= 0.0001 {
        format!("${:.6}", price)
    } else {
        format!("${:.8}", price)
    }
}

fn group_thousands(formatted: &str) -> String {
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, ch) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

/// Format an article publish date as "March 5, 2024 • 14:30:00 UTC".
/// Unparseable input is returned unchanged rather than dropped.
pub fn format_article_date(date: &str) -> String {
    let parsed: Option<DateTime<Utc>> = DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| naive.and_utc())
                .ok()
        });

    match parsed {
        Some(dt) => format!(
            "{} \u{2022} {} UTC",
            dt.format("%B %-d, %Y"),
            dt.format("%H:%M:%S")
        ),
        None => date.to_string(),
    }
}

// ==============================================================================
// Article Link Helpers
// ==============================================================================

pub fn is_internal_link(url: &str) -> bool {
    url.contains(CONTENT_SITE_HOST)
}

pub fn extract_article_slug(url: &str) -> Option<String> {
    ARTICLE_SLUG_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}
