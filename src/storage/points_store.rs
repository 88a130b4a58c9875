use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::errors::AppError;
use crate::external::api_client::ApiClient;
use crate::models::points::{
    PointsLedger, ReadingProgress, TrackReadOutcome, DAILY_CLAIM_POINTS, DAILY_QUEST_ARTICLES,
};
use crate::storage::local::{keys, LocalBlobs};

// ==============================================================================
// Points Store
// ==============================================================================

/// Persistence capability for the points ledger. Claim-cooldown validation
/// is the service's job; the store just applies the mutation.
#[async_trait]
pub trait PointsStore: Send + Sync {
    async fn ledger(&self) -> Result<PointsLedger, AppError>;
    /// Apply the daily claim: credit the claim points and stamp the claim
    /// time.
    async fn claim(&self) -> Result<PointsLedger, AppError>;
    async fn add_points(&self, delta: i64) -> Result<PointsLedger, AppError>;
}

/// Persistence capability for daily reading-quest progress. `track_read`
/// owns the reward ladder so both modes report identical outcomes.
#[async_trait]
pub trait ReadingProgressStore: Send + Sync {
    async fn progress(&self) -> Result<ReadingProgress, AppError>;
    async fn track_read(&self, article_url: &str) -> Result<TrackReadOutcome, AppError>;
}

// ==============================================================================
// Local (device storage) implementations
// ==============================================================================

pub struct LocalPointsStore {
    blobs: LocalBlobs,
}

impl LocalPointsStore {
    pub fn new(blobs: LocalBlobs) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl PointsStore for LocalPointsStore {
    async fn ledger(&self) -> Result<PointsLedger, AppError> {
        Ok(self.blobs.read(keys::POINTS).await?.unwrap_or_default())
    }

    async fn claim(&self) -> Result<PointsLedger, AppError> {
        let mut ledger = self.ledger().await?;
        ledger.points += DAILY_CLAIM_POINTS;
        ledger.last_claim_at = Some(Utc::now());
        self.blobs.write(keys::POINTS, &ledger).await?;
        Ok(ledger)
    }

    async fn add_points(&self, delta: i64) -> Result<PointsLedger, AppError> {
        let mut ledger = self.ledger().await?;
        ledger.points += delta;
        self.blobs.write(keys::POINTS, &ledger).await?;
        Ok(ledger)
    }
}

pub struct LocalReadingProgressStore {
    blobs: LocalBlobs,
}

impl LocalReadingProgressStore {
    pub fn new(blobs: LocalBlobs) -> Self {
        Self { blobs }
    }

    /// Load today's progress, resetting any stale entry from a previous day.
    async fn today(&self) -> Result<ReadingProgress, AppError> {
        let today = Utc::now().date_naive();
        let stored: Option<ReadingProgress> = self.blobs.read(keys::READING_PROGRESS).await?;

        Ok(match stored {
            Some(progress) if progress.date == today => progress,
            _ => ReadingProgress::fresh(today),
        })
    }
}

#[async_trait]
impl ReadingProgressStore for LocalReadingProgressStore {
    async fn progress(&self) -> Result<ReadingProgress, AppError> {
        self.today().await
    }

    async fn track_read(&self, article_url: &str) -> Result<TrackReadOutcome, AppError> {
        let mut progress = self.today().await?;

        if progress.read_articles.iter().any(|url| url == article_url) {
            return Ok(TrackReadOutcome::already_read());
        }

        let points = progress.next_reward();
        progress.articles_read += 1;
        progress.points_today += points;
        progress.read_articles.push(article_url.to_string());

        self.blobs.write(keys::READING_PROGRESS, &progress).await?;

        // Credit the ledger in the same pass so the balance and the quest
        // never drift apart locally.
        if points > 0 {
            let points_store = LocalPointsStore::new(self.blobs.clone());
            points_store.add_points(points).await?;
        }

        Ok(TrackReadOutcome {
            already_read: false,
            points,
            article_number: progress.articles_read,
            completed: progress.completed(),
            got_bonus: progress.articles_read == DAILY_QUEST_ARTICLES,
        })
    }
}

// ==============================================================================
// Remote (per-user API) implementations
// ==============================================================================

pub struct RemotePointsStore {
    api: ApiClient,
}

impl RemotePointsStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PointsStore for RemotePointsStore {
    async fn ledger(&self) -> Result<PointsLedger, AppError> {
        self.api.get_json("/api/rewards/get").await
    }

    async fn claim(&self) -> Result<PointsLedger, AppError> {
        self.api
            .post_json("/api/rewards/claim", &json!({}))
            .await
    }

    async fn add_points(&self, delta: i64) -> Result<PointsLedger, AppError> {
        self.api
            .post_json("/api/rewards/add", &json!({ "points": delta }))
            .await
    }
}

pub struct RemoteReadingProgressStore {
    api: ApiClient,
}

impl RemoteReadingProgressStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReadingProgressStore for RemoteReadingProgressStore {
    async fn progress(&self) -> Result<ReadingProgress, AppError> {
        self.api.get_json("/api/articles/reading-progress").await
    }

    async fn track_read(&self, article_url: &str) -> Result<TrackReadOutcome, AppError> {
        self.api
            .post_json(
                "/api/articles/track-read",
                &json!({ "articleUrl": article_url }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reading_rewards_follow_the_ladder() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());
        let store = LocalReadingProgressStore::new(blobs.clone());

        let first = store.track_read("https://example.com/a").await.unwrap();
        assert_eq!(first.points, 10);
        assert_eq!(first.article_number, 1);
        assert!(!first.completed);

        let second = store.track_read("https://example.com/b").await.unwrap();
        assert_eq!(second.points, 15);

        let third = store.track_read("https://example.com/c").await.unwrap();
        assert_eq!(third.points, 25);
        assert!(third.completed);
        assert!(third.got_bonus);

        // Ledger accumulated all three rewards.
        let ledger = LocalPointsStore::new(blobs).ledger().await.unwrap();
        assert_eq!(ledger.points, 50);
    }

    #[tokio::test]
    async fn test_rereading_an_article_awards_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalReadingProgressStore::new(LocalBlobs::new(dir.path()));

        store.track_read("https://example.com/a").await.unwrap();
        let again = store.track_read("https://example.com/a").await.unwrap();

        assert!(again.already_read);
        assert_eq!(again.points, 0);

        let progress = store.progress().await.unwrap();
        assert_eq!(progress.articles_read, 1);
    }

    #[tokio::test]
    async fn test_stale_progress_resets_to_today() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobs::new(dir.path());

        let stale = ReadingProgress {
            date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            articles_read: 3,
            points_today: 50,
            read_articles: vec!["https://example.com/old".to_string()],
        };
        blobs.write(keys::READING_PROGRESS, &stale).await.unwrap();

        let store = LocalReadingProgressStore::new(blobs);
        let progress = store.progress().await.unwrap();

        assert_eq!(progress.articles_read, 0);
        assert_eq!(progress.points_today, 0);
        assert!(progress.read_articles.is_empty());
    }

    #[tokio::test]
    async fn test_claim_credits_points_and_stamps_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalPointsStore::new(LocalBlobs::new(dir.path()));

        let ledger = store.claim().await.unwrap();
        assert_eq!(ledger.points, DAILY_CLAIM_POINTS);
        assert!(ledger.last_claim_at.is_some());
    }
}
