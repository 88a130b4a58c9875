use tracing::info;

use crate::errors::AppError;
use crate::models::news::Post;

const DEFAULT_API_BASE: &str = "https://cryptopotato.com/wp-json/wp/v2";

/// Query parameters for one page of posts.
#[derive(Debug, Clone)]
pub struct PostsQuery {
    pub page: u32,
    pub per_page: u32,
    /// Numeric category ids; empty means all categories.
    pub categories: Vec<u64>,
}

impl Default for PostsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            categories: Vec::new(),
        }
    }
}

/// Client for the WordPress REST content source. Posts are requested with
/// `?_embed` so the featured media and author arrive in the same response.
pub struct WordPressClient {
    base_url: String,
    client: reqwest::Client,
}

impl WordPressClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("CONTENT_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base)
    }

    pub async fn fetch_posts(&self, query: &PostsQuery) -> Result<Vec<Post>, AppError> {
        let mut url = format!(
            "{}/posts?_embed&sticky=false&per_page={}&page={}",
            self.base_url.trim_end_matches('/'),
            query.per_page,
            query.page
        );
        if !query.categories.is_empty() {
            let csv = query
                .categories
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            url.push_str(&format!("&categories={}", csv));
        }

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "content source returned {}",
                status
            )));
        }

        let posts: Vec<Post> = response
            .json()
            .await
            .map_err(|e| AppError::Parse(e.to_string()))?;

        info!("📰 Fetched {} posts (page {})", posts.len(), query.page);
        Ok(posts)
    }
}
