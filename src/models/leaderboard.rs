use serde::{Deserialize, Serialize};

// ==============================================================================
// Leaderboard Models (remote-only entity)
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prize {
    pub rank: u32,
    pub prize: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub prizes: Vec<Prize>,
}

/// The signed-in user's own rank. `rank` is `None` when signed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyRank {
    pub rank: Option<u32>,
    pub points: i64,
    #[serde(default)]
    pub nearby: Vec<LeaderboardEntry>,
}

impl Default for MyRank {
    fn default() -> Self {
        Self {
            rank: None,
            points: 0,
            nearby: Vec::new(),
        }
    }
}
