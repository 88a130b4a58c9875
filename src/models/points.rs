use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Points & Daily Quest Models
// ==============================================================================

/// Points awarded by the daily claim button.
pub const DAILY_CLAIM_POINTS: i64 = 10;

/// How many finished articles complete the daily reading quest.
pub const DAILY_QUEST_ARTICLES: u32 = 3;

/// The user's points balance plus the timestamp gating the daily claim.
///
/// Serialized names follow the persisted blob layout (`points`,
/// `lastClaimAt`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsLedger {
    pub points: i64,
    pub last_claim_at: Option<DateTime<Utc>>,
}

/// Daily reading-quest state. Resets when `date` is no longer today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub date: NaiveDate,
    pub articles_read: u32,
    pub points_today: i64,
    pub read_articles: Vec<String>,
}

impl ReadingProgress {
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            articles_read: 0,
            points_today: 0,
            read_articles: Vec::new(),
        }
    }

    /// Whether the daily quest (three articles) is complete.
    pub fn completed(&self) -> bool {
        self.articles_read >= DAILY_QUEST_ARTICLES
    }

    /// Reward ladder for the daily quest: the 1st/2nd/3rd article of the day
    /// pay 10/15/25 points, anything past the quest pays nothing.
    pub fn next_reward(&self) -> i64 {
        match self.articles_read {
            0 => 10,
            1 => 15,
            2 => 25,
            _ => 0,
        }
    }
}

/// Result of recording one finished article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackReadOutcome {
    pub already_read: bool,
    pub points: i64,
    pub article_number: u32,
    pub completed: bool,
    pub got_bonus: bool,
}

impl TrackReadOutcome {
    pub fn already_read() -> Self {
        Self {
            already_read: true,
            points: 0,
            article_number: 0,
            completed: false,
            got_bonus: false,
        }
    }
}
