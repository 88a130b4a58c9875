use serde::{Deserialize, Serialize};

/// Category id the content site uses for breaking news.
pub const BREAKING_NEWS_CATEGORY: u64 = 48177;

// ==============================================================================
// WordPress Post Models
// ==============================================================================

/// An HTML-rendered field (`title.rendered`, `content.rendered`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

/// One post from the WordPress REST API, with the `_embedded` media/author
/// payload requested via `?_embed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    /// ISO8601 publish date as delivered by the API.
    pub date: String,
    pub link: String,
    pub title: Rendered,
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Option<Vec<EmbeddedMedia>>,
    #[serde(default)]
    pub author: Option<Vec<EmbeddedAuthor>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedMedia {
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

impl Post {
    pub fn featured_image(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .featured_media
            .as_ref()?
            .first()?
            .source_url
            .as_deref()
    }

    pub fn author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .author
            .as_ref()?
            .first()?
            .name
            .as_deref()
    }

    pub fn is_breaking(&self) -> bool {
        self.categories.contains(&BREAKING_NEWS_CATEGORY)
    }
}
