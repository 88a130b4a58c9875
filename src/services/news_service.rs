use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::errors::AppError;
use crate::external::wordpress::{PostsQuery, WordPressClient};
use crate::models::news::Post;

// ==============================================================================
// Category News Cache
// ==============================================================================

/// Accumulated articles keyed by category selection. Owned by the app state
/// so the accumulation lives with the session instead of an ambient
/// module-level ref.
#[derive(Default)]
pub struct NewsCache {
    entries: DashMap<String, Vec<Post>>,
}

/// Cache key for a category selection. The empty selection is its own
/// bucket.
pub fn category_key(categories: &[u64]) -> String {
    if categories.is_empty() {
        "all".to_string()
    } else {
        categories
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl NewsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Vec<Post> {
        self.entries
            .get(key)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Append a page of posts, dropping any ids already accumulated so
    /// overlapping pages never duplicate articles.
    pub fn append(&self, key: &str, posts: Vec<Post>) {
        let mut entry = self.entries.entry(key.to_string()).or_default();
        for post in posts {
            if !entry.iter().any(|existing| existing.id == post.id) {
                entry.push(post);
            }
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

// ==============================================================================
// News Service
// ==============================================================================

pub struct NewsService {
    client: Arc<WordPressClient>,
    cache: Arc<NewsCache>,
}

impl NewsService {
    pub fn new(client: Arc<WordPressClient>, cache: Arc<NewsCache>) -> Self {
        Self { client, cache }
    }

    /// Fetch one page for a category selection and return everything
    /// accumulated for it so far, in fetch order.
    pub async fn load_page(&self, categories: &[u64], page: u32) -> Result<Vec<Post>, AppError> {
        let query = PostsQuery {
            page,
            categories: categories.to_vec(),
            ..PostsQuery::default()
        };
        let posts = self.client.fetch_posts(&query).await?;

        let key = category_key(categories);
        self.cache.append(&key, posts);

        Ok(self.cache.get(&key))
    }

    /// Cached articles for a category selection without touching the
    /// network.
    pub fn cached(&self, categories: &[u64]) -> Vec<Post> {
        self.cache.get(&category_key(categories))
    }

    /// Drop the accumulation for a category and fetch its first page fresh.
    pub async fn refresh(&self, categories: &[u64]) -> Result<Vec<Post>, AppError> {
        let key = category_key(categories);
        self.cache.invalidate(&key);
        info!("🗑️ Invalidated news cache for '{}'", key);
        self.load_page(categories, 1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, title: &str) -> Post {
        Post {
            id,
            date: "2024-03-05T10:00:00".to_string(),
            link: format!("https://cryptopotato.com/post-{}/", id),
            title: crate::models::news::Rendered {
                rendered: title.to_string(),
            },
            content: Default::default(),
            excerpt: Default::default(),
            categories: Vec::new(),
            embedded: None,
        }
    }

    #[test]
    fn test_category_key() {
        assert_eq!(category_key(&[]), "all");
        assert_eq!(category_key(&[5]), "5");
        assert_eq!(category_key(&[5, 93]), "5,93");
    }

    #[test]
    fn test_append_accumulates_in_order() {
        let cache = NewsCache::new();
        cache.append("all", vec![post(1, "a"), post(2, "b")]);
        cache.append("all", vec![post(3, "c")]);

        let ids: Vec<u64> = cache.get("all").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_append_deduplicates_by_id() {
        let cache = NewsCache::new();
        cache.append("all", vec![post(1, "a"), post(2, "b")]);
        // Page overlap: post 2 comes back again alongside a new one.
        cache.append("all", vec![post(2, "b"), post(3, "c")]);

        let ids: Vec<u64> = cache.get("all").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_categories_are_isolated() {
        let cache = NewsCache::new();
        cache.append("all", vec![post(1, "a")]);
        cache.append("5", vec![post(2, "b")]);

        assert_eq!(cache.get("all").len(), 1);
        assert_eq!(cache.get("5").len(), 1);

        cache.invalidate("5");
        assert!(cache.get("5").is_empty());
        assert_eq!(cache.get("all").len(), 1);
    }
}
